use chrono::Weekday;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{error, info};

use crate::appointment::DEFAULT_LENGTH_MINUTES;

pub const DEFAULT_TIMEZONE: &str = "UTC";

fn default_length_minutes() -> i64 {
    DEFAULT_LENGTH_MINUTES
}

fn default_week_start() -> String {
    "monday".to_string()
}

fn default_day_start_hour() -> u32 {
    8
}

fn default_day_end_hour() -> u32 {
    18
}

/// Practice-wide scheduling settings, loaded from `practice.toml` in the
/// data directory. Every field falls back to a sane default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PracticeConfig {
    #[serde(default)]
    pub version: u32,
    pub timezone: Option<String>,
    #[serde(default = "default_length_minutes")]
    pub default_length_minutes: i64,
    #[serde(default = "default_week_start")]
    pub week_start: String,
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            timezone: None,
            default_length_minutes: default_length_minutes(),
            week_start: default_week_start(),
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
        }
    }
}

impl PracticeConfig {
    pub fn from_toml(raw: &str) -> Self {
        match toml::from_str::<PracticeConfig>(raw) {
            Ok(mut config) => {
                config.sanitize();
                info!(
                    version = config.version,
                    timezone = ?config.timezone,
                    default_length = config.default_length_minutes,
                    week_start = %config.week_start,
                    "loaded practice config"
                );
                config
            }
            Err(err) => {
                error!(error = %err, "failed parsing practice config; using defaults");
                PracticeConfig::default()
            }
        }
    }

    pub fn sanitize(&mut self) {
        if self.default_length_minutes <= 0 {
            self.default_length_minutes = default_length_minutes();
        }
        if self.week_start.trim().is_empty() {
            self.week_start = default_week_start();
        }
        if self.day_start_hour > 23 {
            self.day_start_hour = 23;
        }
        if self.day_end_hour > 23 {
            self.day_end_hour = 23;
        }
        if self.day_end_hour < self.day_start_hour {
            self.day_end_hour = self.day_start_hour;
        }
    }

    pub fn week_start_day(&self) -> Weekday {
        if self.week_start.trim().eq_ignore_ascii_case("sunday") {
            Weekday::Sun
        } else {
            Weekday::Mon
        }
    }

    pub fn resolve_timezone(&self) -> Tz {
        if let Some(raw) = self.timezone.as_ref() {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                match trimmed.parse::<Tz>() {
                    Ok(tz) => return tz,
                    Err(err) => {
                        error!(timezone = %trimmed, error = %err, "invalid timezone id");
                    }
                }
            }
        }
        DEFAULT_TIMEZONE.parse().unwrap_or(chrono_tz::UTC)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_practice_config(data_dir: &std::path::Path) -> PracticeConfig {
    let path = data_dir.join("practice.toml");
    match std::fs::read_to_string(&path) {
        Ok(raw) => PracticeConfig::from_toml(&raw),
        Err(_) => {
            info!(path = %path.display(), "no practice.toml; using defaults");
            PracticeConfig::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn resolve_data_dir() -> std::path::PathBuf {
    if let Ok(path) = std::env::var("CASELOAD_DATA") {
        return std::path::PathBuf::from(path);
    }

    if let Some(base) = dirs::data_local_dir() {
        return base.join("caseload");
    }

    std::path::PathBuf::from(".caseload_data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = PracticeConfig::from_toml("");
        assert_eq!(config.default_length_minutes, 50);
        assert_eq!(config.week_start_day(), Weekday::Mon);
        assert_eq!(config.day_start_hour, 8);
        assert_eq!(config.day_end_hour, 18);
        assert_eq!(config.resolve_timezone(), chrono_tz::UTC);
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let config = PracticeConfig::from_toml("not valid [toml");
        assert_eq!(config, PracticeConfig::default());
    }

    #[test]
    fn sanitize_repairs_out_of_range_values() {
        let config = PracticeConfig::from_toml(
            "default_length_minutes = -5\nday_start_hour = 30\nday_end_hour = 2\nweek_start = \"\"",
        );
        assert_eq!(config.default_length_minutes, 50);
        assert_eq!(config.day_start_hour, 23);
        assert_eq!(config.day_end_hour, 23);
        assert_eq!(config.week_start, "monday");
    }

    #[test]
    fn week_start_sunday_is_recognized() {
        let config = PracticeConfig::from_toml("week_start = \"Sunday\"");
        assert_eq!(config.week_start_day(), Weekday::Sun);
    }

    #[test]
    fn named_timezone_resolves() {
        let config = PracticeConfig::from_toml("timezone = \"America/New_York\"");
        assert_eq!(config.resolve_timezone(), chrono_tz::America::New_York);
    }
}

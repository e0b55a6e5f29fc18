use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

pub fn start_of_week(day: NaiveDate, week_start: Weekday) -> NaiveDate {
    let day_idx = day.weekday().num_days_from_monday() as i64;
    let start_idx = week_start.num_days_from_monday() as i64;
    let diff = (7 + day_idx - start_idx) % 7;
    add_days(day, -diff)
}

pub fn week_days(focus: NaiveDate, week_start: Weekday) -> [NaiveDate; 7] {
    let start = start_of_week(focus, week_start);
    std::array::from_fn(|offset| add_days(start, offset as i64))
}

pub fn shift_weeks(focus: NaiveDate, step: i64) -> NaiveDate {
    add_days(focus, step * 7)
}

pub fn today_in_timezone(timezone: Tz) -> NaiveDate {
    Utc::now().with_timezone(&timezone).date_naive()
}

/// First timestamp of a clicked empty slot: the slot's wall-clock start in
/// the practice timezone, expressed in UTC. `None` for wall-clock times that
/// do not exist in the timezone (spring-forward gaps).
pub fn slot_seed(day: NaiveDate, hour: u32, timezone: Tz) -> Option<DateTime<Utc>> {
    let naive = day.and_hms_opt(hour, 0, 0)?;
    timezone
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

pub fn local_day(instant: DateTime<Utc>, timezone: Tz) -> NaiveDate {
    instant.with_timezone(&timezone).date_naive()
}

pub fn local_hour(instant: DateTime<Utc>, timezone: Tz) -> u32 {
    instant.with_timezone(&timezone).hour()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn start_of_week_respects_configured_first_day() {
        // 2024-03-01 is a Friday.
        let friday = date(2024, 3, 1);
        assert_eq!(start_of_week(friday, Weekday::Mon), date(2024, 2, 26));
        assert_eq!(start_of_week(friday, Weekday::Sun), date(2024, 2, 25));
    }

    #[test]
    fn week_days_covers_seven_consecutive_days() {
        let days = week_days(date(2024, 3, 1), Weekday::Mon);
        assert_eq!(days[0], date(2024, 2, 26));
        assert_eq!(days[6], date(2024, 3, 3));
        for pair in days.windows(2) {
            assert_eq!(add_days(pair[0], 1), pair[1]);
        }
    }

    #[test]
    fn shift_weeks_moves_in_whole_weeks() {
        let focus = date(2024, 3, 1);
        assert_eq!(shift_weeks(focus, 1), date(2024, 3, 8));
        assert_eq!(shift_weeks(focus, -2), date(2024, 2, 16));
    }

    #[test]
    fn slot_seed_converts_practice_wall_clock_to_utc() {
        let seed = slot_seed(date(2024, 3, 1), 9, chrono_tz::America::New_York)
            .expect("slot exists");
        assert_eq!(seed, Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).single().expect("utc"));
        assert_eq!(local_day(seed, chrono_tz::America::New_York), date(2024, 3, 1));
        assert_eq!(local_hour(seed, chrono_tz::America::New_York), 9);
    }

    #[test]
    fn slot_seed_in_utc_is_identity() {
        let seed = slot_seed(date(2024, 3, 1), 9, chrono_tz::UTC).expect("slot exists");
        assert_eq!(seed, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().expect("utc"));
    }
}

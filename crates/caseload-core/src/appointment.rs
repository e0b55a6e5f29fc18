use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback session length when the practice config does not override it.
pub const DEFAULT_LENGTH_MINUTES: i64 = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentKind {
    /// Session linked to a client record; the title is derived from the client.
    Client,
    /// Free-text entry (supervision, admin block, personal hold).
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,

    pub title: String,

    pub start: DateTime<Utc>,

    /// Always `start + length_minutes`.
    pub end: DateTime<Utc>,

    pub length_minutes: i64,

    #[serde(default)]
    pub client_id: Option<Uuid>,

    pub therapist_id: Uuid,

    pub kind: AppointmentKind,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    pub id: Uuid,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Schedule display title: first name plus last initial, e.g. "Ana L.".
    /// `None` when the client record has no last name to abbreviate.
    pub fn display_title(&self) -> Option<String> {
        let initial = self.last_name.trim().chars().next()?;
        Some(format!("{} {}.", self.first_name.trim(), initial))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: Uuid,

    pub appointment_id: Uuid,

    #[serde(default)]
    pub body: String,

    /// A signed note anchors its appointment; deletion is refused while set.
    #[serde(default)]
    pub signed_by_therapist: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Therapist {
    pub id: Uuid,
    pub name: String,
}

use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentKindDto {
  Client,
  Other
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct AppointmentDto {
  pub id:             Uuid,
  #[serde(default)]
  pub title:          String,
  pub start:          String,
  pub end:            String,
  pub length_minutes: i64,
  pub client_id:      Option<Uuid>,
  pub therapist_id:   Uuid,
  pub kind:           AppointmentKindDto
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct AppointmentsListArgs {
  pub from: Option<String>,
  pub to:   Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct AppointmentCreate {
  pub title:          String,
  pub start:          String,
  pub end:            String,
  pub length_minutes: i64,
  pub client_id:      Option<Uuid>,
  pub therapist_id:   Uuid,
  pub kind:           AppointmentKindDto
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct AppointmentUpdateArgs {
  pub id:      Uuid,
  pub payload: AppointmentCreate
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct AppointmentIdArg {
  pub id: Uuid
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ClientDto {
  pub id:         Uuid,
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name:  String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct ClientIdArg {
  pub id: Uuid
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct NoteDto {
  pub id:                  Uuid,
  pub appointment_id:      Uuid,
  #[serde(default)]
  pub signed_by_therapist: bool
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TherapistDto {
  pub id:   Uuid,
  pub name: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct PracticeSettingsDto {
  pub timezone:               String,
  pub default_length_minutes: i64,
  pub week_start:             String,
  pub day_start_hour:         u32,
  pub day_end_hour:           u32
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct SessionDto {
  pub therapist: TherapistDto,
  pub clients:   Vec<ClientDto>,
  pub settings:  PracticeSettingsDto
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn appointment_kind_uses_lowercase_wire_names(
  ) {
    let encoded = serde_json::to_string(
      &AppointmentKindDto::Client
    )
    .expect("encode kind");
    assert_eq!(encoded, "\"client\"");

    let decoded: AppointmentKindDto =
      serde_json::from_str("\"other\"")
        .expect("decode kind");
    assert_eq!(
      decoded,
      AppointmentKindDto::Other
    );
  }

  #[test]
  fn note_signed_flag_defaults_to_false()
  {
    let raw = format!(
      "{{\"id\":\"{}\",\"appointment_id\":\"{}\"}}",
      Uuid::new_v4(),
      Uuid::new_v4()
    );
    let note: NoteDto =
      serde_json::from_str(&raw)
        .expect("decode note");
    assert!(!note.signed_by_therapist);
  }
}

use caseload_core::appointment::{Appointment, AppointmentKind, Client, Note};
use caseload_core::form::AppointmentPayload;
use caseload_gui_shared::{
    AppointmentCreate, AppointmentDto, AppointmentKindDto, ClientDto, NoteDto,
};
use chrono::{DateTime, Utc};

/// An appointment with its wire datetimes already parsed, ready for grid
/// placement and form editing.
#[derive(Clone, PartialEq)]
pub struct ScheduleEvent {
    pub dto: AppointmentDto,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Parses list results into renderable events. Records with malformed
/// datetimes are logged and dropped rather than poisoning the whole grid.
pub fn collect_events(appointments: &[AppointmentDto]) -> Vec<ScheduleEvent> {
    let mut events = Vec::with_capacity(appointments.len());
    for dto in appointments {
        let start = parse_wire_datetime(&dto.start);
        let end = parse_wire_datetime(&dto.end);
        match (start, end) {
            (Some(start), Some(end)) => events.push(ScheduleEvent {
                dto: dto.clone(),
                start,
                end,
            }),
            _ => {
                tracing::warn!(id = %dto.id, "skipping appointment with unparseable datetimes");
            }
        }
    }
    events.sort_by_key(|event| event.start);
    events
}

fn parse_wire_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

pub fn appointment_from_event(event: &ScheduleEvent) -> Appointment {
    Appointment {
        id: event.dto.id,
        title: event.dto.title.clone(),
        start: event.start,
        end: event.end,
        length_minutes: event.dto.length_minutes,
        client_id: event.dto.client_id,
        therapist_id: event.dto.therapist_id,
        kind: kind_from_dto(event.dto.kind),
        created: event.start,
        modified: event.start,
    }
}

pub fn client_from_dto(dto: ClientDto) -> Client {
    Client {
        id: dto.id,
        first_name: dto.first_name,
        last_name: dto.last_name,
    }
}

pub fn note_from_dto(dto: NoteDto) -> Note {
    Note {
        id: dto.id,
        appointment_id: dto.appointment_id,
        body: String::new(),
        signed_by_therapist: dto.signed_by_therapist,
    }
}

pub fn kind_from_dto(kind: AppointmentKindDto) -> AppointmentKind {
    match kind {
        AppointmentKindDto::Client => AppointmentKind::Client,
        AppointmentKindDto::Other => AppointmentKind::Other,
    }
}

pub fn kind_to_dto(kind: AppointmentKind) -> AppointmentKindDto {
    match kind {
        AppointmentKind::Client => AppointmentKindDto::Client,
        AppointmentKind::Other => AppointmentKindDto::Other,
    }
}

pub fn create_from_payload(payload: &AppointmentPayload) -> AppointmentCreate {
    AppointmentCreate {
        title: payload.title.clone(),
        start: payload.start.to_rfc3339(),
        end: payload.end.to_rfc3339(),
        length_minutes: payload.length_minutes,
        client_id: payload.client_id,
        therapist_id: payload.therapist_id,
        kind: kind_to_dto(payload.kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn dto(start: &str, end: &str) -> AppointmentDto {
        AppointmentDto {
            id: Uuid::new_v4(),
            title: "Ana L.".to_string(),
            start: start.to_string(),
            end: end.to_string(),
            length_minutes: 50,
            client_id: Some(Uuid::new_v4()),
            therapist_id: Uuid::new_v4(),
            kind: AppointmentKindDto::Client,
        }
    }

    #[test]
    fn malformed_datetimes_are_dropped() {
        let records = vec![
            dto("2024-03-01T09:00:00+00:00", "2024-03-01T09:50:00+00:00"),
            dto("not a datetime", "2024-03-01T10:50:00+00:00"),
        ];
        let events = collect_events(&records);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].dto.id, records[0].id);
    }

    #[test]
    fn events_are_sorted_by_start() {
        let records = vec![
            dto("2024-03-01T11:00:00+00:00", "2024-03-01T11:50:00+00:00"),
            dto("2024-03-01T09:00:00+00:00", "2024-03-01T09:50:00+00:00"),
        ];
        let events = collect_events(&records);
        assert!(events[0].start < events[1].start);
    }
}

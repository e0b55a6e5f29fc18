use anyhow::Context;
use caseload_core::appointment::{Appointment, AppointmentKind, Client, Note, Therapist};
use caseload_core::config::{self, PracticeConfig};
use caseload_core::datastore::DataStore;
use caseload_gui_shared::{
    AppointmentCreate, AppointmentDto, AppointmentKindDto, AppointmentUpdateArgs,
    AppointmentsListArgs, ClientDto, NoteDto, PracticeSettingsDto, SessionDto, TherapistDto,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

pub struct AppState {
    store: Mutex<DataStore>,
    config: PracticeConfig,
    therapist: Therapist,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        let data_dir = config::resolve_data_dir();
        let store = DataStore::open(&data_dir)
            .with_context(|| format!("failed to open datastore at {}", data_dir.display()))?;
        let config = config::load_practice_config(&data_dir);
        let therapist = store.load_or_init_therapist()?;
        Ok(Self {
            store: Mutex::new(store),
            config,
            therapist,
        })
    }

    #[instrument(skip(self))]
    pub fn session(&self) -> anyhow::Result<SessionDto> {
        let store = self.store.lock();
        let clients = store.load_clients()?;
        Ok(SessionDto {
            therapist: TherapistDto {
                id: self.therapist.id,
                name: self.therapist.name.clone(),
            },
            clients: clients.into_iter().map(client_to_dto).collect(),
            settings: PracticeSettingsDto {
                timezone: self.config.resolve_timezone().name().to_string(),
                default_length_minutes: self.config.default_length_minutes,
                week_start: self.config.week_start.clone(),
                day_start_hour: self.config.day_start_hour,
                day_end_hour: self.config.day_end_hour,
            },
        })
    }

    #[instrument(skip(self))]
    pub fn list(&self, args: AppointmentsListArgs) -> anyhow::Result<Vec<AppointmentDto>> {
        let from = args
            .from
            .as_deref()
            .map(parse_rfc3339)
            .transpose()
            .context("invalid `from` bound")?;
        let to = args
            .to
            .as_deref()
            .map(parse_rfc3339)
            .transpose()
            .context("invalid `to` bound")?;

        let store = self.store.lock();
        let appointments = store.load_appointments()?;

        let filtered: Vec<AppointmentDto> = appointments
            .into_iter()
            .filter(|appointment| {
                if let Some(from) = from
                    && appointment.end <= from
                {
                    return false;
                }
                if let Some(to) = to
                    && appointment.start >= to
                {
                    return false;
                }
                true
            })
            .map(appointment_to_dto)
            .collect();

        debug!(count = filtered.len(), "listed appointments");
        Ok(filtered)
    }

    #[instrument(skip(self, create))]
    pub fn create(&self, create: AppointmentCreate) -> anyhow::Result<AppointmentDto> {
        let now = Utc::now();
        let store = self.store.lock();
        let mut appointments = store.load_appointments()?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            title: create.title,
            start: parse_rfc3339(&create.start).context("invalid appointment start")?,
            end: parse_rfc3339(&create.end).context("invalid appointment end")?,
            length_minutes: create.length_minutes,
            client_id: create.client_id,
            therapist_id: create.therapist_id,
            kind: kind_from_dto(create.kind),
            created: now,
            modified: now,
        };

        appointments.push(appointment.clone());
        appointments.sort_by_key(|a| a.start);
        store.save_appointments(&appointments)?;

        Ok(appointment_to_dto(appointment))
    }

    #[instrument(skip(self, args), fields(id = %args.id))]
    pub fn update(&self, args: AppointmentUpdateArgs) -> anyhow::Result<AppointmentDto> {
        let now = Utc::now();
        let store = self.store.lock();
        let mut appointments = store.load_appointments()?;

        let updated = {
            let appointment = appointments
                .iter_mut()
                .find(|appointment| appointment.id == args.id)
                .ok_or_else(|| anyhow::anyhow!("appointment not found"))?;

            let payload = args.payload;
            appointment.title = payload.title;
            appointment.start =
                parse_rfc3339(&payload.start).context("invalid appointment start")?;
            appointment.end = parse_rfc3339(&payload.end).context("invalid appointment end")?;
            appointment.length_minutes = payload.length_minutes;
            appointment.client_id = payload.client_id;
            appointment.kind = kind_from_dto(payload.kind);
            appointment.modified = now;
            appointment.clone()
        };

        appointments.sort_by_key(|a| a.start);
        store.save_appointments(&appointments)?;
        Ok(appointment_to_dto(updated))
    }

    /// Removal goes through the datastore's guarded delete, which refuses
    /// while a signed note is attached.
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        let store = self.store.lock();
        store.delete_appointment(id)
    }

    #[instrument(skip(self))]
    pub fn client(&self, id: Uuid) -> anyhow::Result<ClientDto> {
        let store = self.store.lock();
        let client = store
            .client_by_id(id)?
            .ok_or_else(|| anyhow::anyhow!("client not found"))?;
        Ok(client_to_dto(client))
    }

    #[instrument(skip(self))]
    pub fn clients(&self) -> anyhow::Result<Vec<ClientDto>> {
        let store = self.store.lock();
        Ok(store
            .load_clients()?
            .into_iter()
            .map(client_to_dto)
            .collect())
    }

    #[instrument(skip(self))]
    pub fn note_for_appointment(&self, appointment_id: Uuid) -> anyhow::Result<Option<NoteDto>> {
        let store = self.store.lock();
        Ok(store.note_for_appointment(appointment_id)?.map(note_to_dto))
    }
}

fn parse_rfc3339(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("failed parsing datetime {raw:?}"))?;
    Ok(parsed.with_timezone(&Utc))
}

fn kind_from_dto(kind: AppointmentKindDto) -> AppointmentKind {
    match kind {
        AppointmentKindDto::Client => AppointmentKind::Client,
        AppointmentKindDto::Other => AppointmentKind::Other,
    }
}

fn kind_to_dto(kind: AppointmentKind) -> AppointmentKindDto {
    match kind {
        AppointmentKind::Client => AppointmentKindDto::Client,
        AppointmentKind::Other => AppointmentKindDto::Other,
    }
}

fn appointment_to_dto(appointment: Appointment) -> AppointmentDto {
    AppointmentDto {
        id: appointment.id,
        title: appointment.title,
        start: appointment.start.to_rfc3339(),
        end: appointment.end.to_rfc3339(),
        length_minutes: appointment.length_minutes,
        client_id: appointment.client_id,
        therapist_id: appointment.therapist_id,
        kind: kind_to_dto(appointment.kind),
    }
}

fn client_to_dto(client: Client) -> ClientDto {
    ClientDto {
        id: client.id,
        first_name: client.first_name,
        last_name: client.last_name,
    }
}

fn note_to_dto(note: Note) -> NoteDto {
    NoteDto {
        id: note.id,
        appointment_id: note.appointment_id,
        signed_by_therapist: note.signed_by_therapist,
    }
}

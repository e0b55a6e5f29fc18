use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use uuid::Uuid;

use crate::appointment::{Appointment, Client, Note, Therapist};

/// File-backed store: one JSONL file per entity kind, replaced atomically on
/// every save.
#[derive(Debug)]
pub struct DataStore {
    pub data_dir: PathBuf,
    pub appointments_path: PathBuf,
    pub clients_path: PathBuf,
    pub notes_path: PathBuf,
    pub therapist_path: PathBuf,
}

impl DataStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let appointments_path = data_dir.join("appointments.data");
        let clients_path = data_dir.join("clients.data");
        let notes_path = data_dir.join("notes.data");
        let therapist_path = data_dir.join("therapist.data");

        for path in [
            &appointments_path,
            &clients_path,
            &notes_path,
            &therapist_path,
        ] {
            if !path.exists() {
                fs::write(path, "")?;
            }
        }

        info!(
            data_dir = %data_dir.display(),
            appointments = %appointments_path.display(),
            clients = %clients_path.display(),
            notes = %notes_path.display(),
            "opened datastore"
        );

        Ok(Self {
            data_dir,
            appointments_path,
            clients_path,
            notes_path,
            therapist_path,
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn load_appointments(&self) -> anyhow::Result<Vec<Appointment>> {
        load_jsonl(&self.appointments_path).context("failed to load appointments.data")
    }

    #[tracing::instrument(skip(self, appointments))]
    pub fn save_appointments(&self, appointments: &[Appointment]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.appointments_path, appointments)
            .context("failed to save appointments.data")
    }

    #[tracing::instrument(skip(self))]
    pub fn load_clients(&self) -> anyhow::Result<Vec<Client>> {
        load_jsonl(&self.clients_path).context("failed to load clients.data")
    }

    #[tracing::instrument(skip(self, clients))]
    pub fn save_clients(&self, clients: &[Client]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.clients_path, clients).context("failed to save clients.data")
    }

    #[tracing::instrument(skip(self))]
    pub fn load_notes(&self) -> anyhow::Result<Vec<Note>> {
        load_jsonl(&self.notes_path).context("failed to load notes.data")
    }

    #[tracing::instrument(skip(self, notes))]
    pub fn save_notes(&self, notes: &[Note]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.notes_path, notes).context("failed to save notes.data")
    }

    #[tracing::instrument(skip(self))]
    pub fn client_by_id(&self, id: Uuid) -> anyhow::Result<Option<Client>> {
        Ok(self
            .load_clients()?
            .into_iter()
            .find(|client| client.id == id))
    }

    #[tracing::instrument(skip(self))]
    pub fn note_for_appointment(&self, appointment_id: Uuid) -> anyhow::Result<Option<Note>> {
        Ok(self
            .load_notes()?
            .into_iter()
            .find(|note| note.appointment_id == appointment_id))
    }

    /// Removes an appointment, refusing while a signed note is attached.
    /// The form layer applies the same rule before dispatching; repeating
    /// it here keeps a stale or bypassed frontend from deleting under a
    /// finalized note.
    #[tracing::instrument(skip(self))]
    pub fn delete_appointment(&self, id: Uuid) -> anyhow::Result<()> {
        if let Some(note) = self.note_for_appointment(id)?
            && note.signed_by_therapist
        {
            bail!("appointments with a signed note cannot be deleted");
        }

        let mut appointments = self.load_appointments()?;
        let before = appointments.len();
        appointments.retain(|appointment| appointment.id != id);
        if appointments.len() == before {
            bail!("appointment not found");
        }

        self.save_appointments(&appointments)
    }

    /// The owning therapist, created on first access.
    #[tracing::instrument(skip(self))]
    pub fn load_or_init_therapist(&self) -> anyhow::Result<Therapist> {
        let raw = fs::read_to_string(&self.therapist_path)
            .with_context(|| format!("failed reading {}", self.therapist_path.display()))?;
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return serde_json::from_str(trimmed)
                .with_context(|| format!("failed parsing {}", self.therapist_path.display()));
        }

        let therapist = Therapist {
            id: Uuid::new_v4(),
            name: "Therapist".to_string(),
        };
        let serialized = serde_json::to_string(&therapist)?;
        fs::write(&self.therapist_path, serialized)
            .with_context(|| format!("failed writing {}", self.therapist_path.display()))?;
        info!(therapist_id = %therapist.id, "initialized therapist record");
        Ok(therapist)
    }
}

#[tracing::instrument(skip(path))]
fn load_jsonl<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    debug!(file = %path.display(), "loading jsonl");
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: T = serde_json::from_str(trimmed)
            .with_context(|| format!("failed parsing {} line {}", path.display(), idx + 1))?;
        out.push(record);
    }

    debug!(count = out.len(), "loaded records from jsonl");
    Ok(out)
}

#[tracing::instrument(skip(path, records))]
fn save_jsonl_atomic<T: Serialize>(path: &Path, records: &[T]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = records.len(), "saving jsonl atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    for record in records {
        let serialized = serde_json::to_string(record)?;
        writeln!(temp, "{serialized}")?;
    }
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}

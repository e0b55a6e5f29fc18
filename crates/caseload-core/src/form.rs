use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::appointment::{Appointment, AppointmentKind, Client, Note};

/// Local, uncommitted copy of an appointment's fields while the modal is open.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub length_minutes: i64,
    pub client_id: Option<Uuid>,
    pub kind: AppointmentKind,
}

impl Draft {
    fn blank(default_length_minutes: i64) -> Self {
        Self {
            title: String::new(),
            start: None,
            end: None,
            length_minutes: default_length_minutes,
            client_id: None,
            kind: AppointmentKind::Client,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenForm {
    pub mode: FormMode,
    pub draft: Draft,
    /// Enrichment: full record of the linked client, once known.
    pub selected_client: Option<Client>,
    /// Enrichment: the appointment's note, once looked up.
    pub note: Option<Note>,
    pub error: Option<String>,
    title_touched: bool,
    client_touched: bool,
}

/// Secondary lookups to dispatch after seeding an edit draft. Results must be
/// fed back through [`AppointmentForm::apply_client`] / [`apply_note`] with
/// the carried generation so stale resolutions are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentPlan {
    pub generation: u64,
    pub appointment_id: Uuid,
    pub client_id: Option<Uuid>,
}

/// Fields of the create/update dispatch, mirroring the persistence contract.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentPayload {
    pub appointment_id: Option<Uuid>,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub length_minutes: i64,
    pub therapist_id: Uuid,
    pub client_id: Option<Uuid>,
    pub kind: AppointmentKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAction {
    Create(AppointmentPayload),
    Update(AppointmentPayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDecision {
    /// The note on this appointment is already signed; show the blocking
    /// notice and close without calling the delete collaborator.
    Blocked,
    Proceed(Uuid),
}

/// The appointment modal's state machine: closed, create-open, or edit-open,
/// with derived-state recomputation on every mutating input.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentForm {
    open: Option<OpenForm>,
    generation: u64,
}

impl Default for AppointmentForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AppointmentForm {
    pub fn new() -> Self {
        Self {
            open: None,
            generation: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open(&self) -> Option<&OpenForm> {
        self.open.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Empty-slot selection: open in create mode seeded with the slot time.
    pub fn open_create(&mut self, seed: DateTime<Utc>, default_length_minutes: i64) {
        self.generation += 1;
        let mut draft = Draft::blank(default_length_minutes);
        draft.start = Some(seed);
        draft.end = Some(seed + Duration::minutes(default_length_minutes));
        debug!(generation = self.generation, %seed, "form opened in create mode");
        self.open = Some(OpenForm {
            mode: FormMode::Create,
            draft,
            selected_client: None,
            note: None,
            error: None,
            title_touched: false,
            client_touched: false,
        });
    }

    /// Event selection: open in edit mode with every field copied verbatim.
    /// The returned plan names the client/note lookups the caller should
    /// dispatch; the form is fully usable before they resolve.
    pub fn open_edit(&mut self, appointment: &Appointment) -> EnrichmentPlan {
        self.generation += 1;
        let draft = Draft {
            title: appointment.title.clone(),
            start: Some(appointment.start),
            end: Some(appointment.end),
            length_minutes: appointment.length_minutes,
            client_id: appointment.client_id,
            kind: appointment.kind,
        };
        debug!(
            generation = self.generation,
            appointment_id = %appointment.id,
            "form opened in edit mode"
        );
        self.open = Some(OpenForm {
            mode: FormMode::Edit(appointment.id),
            draft,
            selected_client: None,
            note: None,
            error: None,
            title_touched: false,
            client_touched: false,
        });
        EnrichmentPlan {
            generation: self.generation,
            appointment_id: appointment.id,
            client_id: appointment.client_id,
        }
    }

    /// Cancel, successful submit, or delete all land here. The draft has no
    /// existence beyond the open lifetime; the generation stays monotonic so
    /// in-flight enrichment from this open can never apply later.
    pub fn close(&mut self) {
        if self.open.take().is_some() {
            debug!(generation = self.generation, "form closed");
        }
    }

    pub fn set_start(&mut self, start: Option<DateTime<Utc>>) {
        if let Some(open) = self.open.as_mut() {
            open.draft.start = start;
            open.error = None;
            Self::recompute_end(open);
        }
    }

    pub fn set_length(&mut self, minutes: i64) {
        if let Some(open) = self.open.as_mut() {
            open.draft.length_minutes = minutes;
            open.error = None;
            Self::recompute_end(open);
        }
    }

    pub fn set_kind(&mut self, kind: AppointmentKind) {
        if let Some(open) = self.open.as_mut() {
            // Toggling to Other intentionally keeps the selected client; the
            // draft only drops the link on explicit deselection.
            open.draft.kind = kind;
            open.error = None;
        }
    }

    /// Free-text title input (rendered for `Other` appointments). Marks the
    /// title as user-owned so enrichment never overwrites it.
    pub fn set_title(&mut self, title: &str) {
        if let Some(open) = self.open.as_mut() {
            open.draft.title = title.to_string();
            open.title_touched = true;
            open.error = None;
        }
    }

    /// User picked (or cleared) a client in the roster combobox.
    pub fn select_client(&mut self, client: Option<Client>) {
        if let Some(open) = self.open.as_mut() {
            open.draft.client_id = client.as_ref().map(|c| c.id);
            open.selected_client = client;
            open.client_touched = true;
            open.error = None;
            Self::derive_title(open);
        }
    }

    /// Client enrichment resolved. Dropped when the generation is stale or
    /// the user already picked a different client in the interim.
    pub fn apply_client(&mut self, generation: u64, client: Client) {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                "dropping stale client enrichment"
            );
            return;
        }
        if let Some(open) = self.open.as_mut() {
            if open.client_touched {
                debug!("client enrichment skipped; user already chose a client");
                return;
            }
            open.draft.client_id = Some(client.id);
            open.selected_client = Some(client);
            Self::derive_title(open);
        }
    }

    /// Note enrichment resolved (possibly to "no note").
    pub fn apply_note(&mut self, generation: u64, note: Option<Note>) {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                "dropping stale note enrichment"
            );
            return;
        }
        if let Some(open) = self.open.as_mut() {
            open.note = note;
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        if let Some(open) = self.open.as_mut() {
            open.error = Some(message.into());
        }
    }

    /// Build the create-or-update dispatch from the current draft. `Err`
    /// carries the user-visible message for a required-field failure.
    pub fn submit_action(&self, therapist_id: Uuid) -> Result<SubmitAction, String> {
        let open = self
            .open
            .as_ref()
            .ok_or_else(|| "The appointment form is not open.".to_string())?;

        let title = open.draft.title.trim();
        if title.is_empty() {
            return Err("A title is required.".to_string());
        }
        let Some(start) = open.draft.start else {
            return Err("A start time is required.".to_string());
        };
        if open.draft.length_minutes <= 0 {
            return Err("Length must be a positive number of minutes.".to_string());
        }
        let end = open
            .draft
            .end
            .unwrap_or(start + Duration::minutes(open.draft.length_minutes));

        let payload = AppointmentPayload {
            appointment_id: match open.mode {
                FormMode::Create => None,
                FormMode::Edit(id) => Some(id),
            },
            title: title.to_string(),
            start,
            end,
            length_minutes: open.draft.length_minutes,
            therapist_id,
            client_id: open.draft.client_id,
            kind: open.draft.kind,
        };

        Ok(match open.mode {
            FormMode::Create => SubmitAction::Create(payload),
            FormMode::Edit(_) => SubmitAction::Update(payload),
        })
    }

    /// Confirmed delete intent. `None` when the form is not editing an
    /// existing appointment.
    pub fn delete_decision(&self) -> Option<DeleteDecision> {
        let open = self.open.as_ref()?;
        let FormMode::Edit(id) = open.mode else {
            return None;
        };
        if open
            .note
            .as_ref()
            .is_some_and(|note| note.signed_by_therapist)
        {
            return Some(DeleteDecision::Blocked);
        }
        Some(DeleteDecision::Proceed(id))
    }

    /// `end = start + length`, skipped against an unset start.
    fn recompute_end(open: &mut OpenForm) {
        match open.draft.start {
            Some(start) if open.draft.length_minutes > 0 => {
                open.draft.end = Some(start + Duration::minutes(open.draft.length_minutes));
            }
            Some(_) => {}
            None => open.draft.end = None,
        }
    }

    /// Title from the selected client ("First L."), only for client
    /// appointments and only while the user has not typed their own title.
    fn derive_title(open: &mut OpenForm) {
        if open.draft.kind != AppointmentKind::Client || open.title_touched {
            return;
        }
        if let Some(title) = open
            .selected_client
            .as_ref()
            .and_then(Client::display_title)
        {
            open.draft.title = title;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::appointment::DEFAULT_LENGTH_MINUTES;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().expect("valid timestamp")
    }

    fn client(first: &str, last: &str) -> Client {
        Client {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    fn saved_appointment() -> Appointment {
        let start = at(2024, 3, 1, 9, 0);
        Appointment {
            id: Uuid::new_v4(),
            title: "Ana L.".to_string(),
            start,
            end: start + Duration::minutes(50),
            length_minutes: 50,
            client_id: Some(Uuid::new_v4()),
            therapist_id: Uuid::new_v4(),
            kind: AppointmentKind::Client,
            created: start,
            modified: start,
        }
    }

    #[test]
    fn create_mode_seeds_start_length_and_end() {
        let seed = at(2024, 3, 1, 9, 0);
        let mut form = AppointmentForm::new();
        form.open_create(seed, DEFAULT_LENGTH_MINUTES);

        let open = form.open().expect("form open");
        assert_eq!(open.mode, FormMode::Create);
        assert_eq!(open.draft.start, Some(seed));
        assert_eq!(open.draft.length_minutes, 50);
        assert_eq!(open.draft.kind, AppointmentKind::Client);
        assert_eq!(open.draft.end, Some(at(2024, 3, 1, 9, 50)));
        assert!(open.draft.title.is_empty());
        assert!(open.draft.client_id.is_none());
    }

    #[test]
    fn end_tracks_start_and_length() {
        let mut form = AppointmentForm::new();
        form.open_create(at(2024, 3, 1, 9, 0), 50);

        form.set_length(90);
        assert_eq!(
            form.open().expect("open").draft.end,
            Some(at(2024, 3, 1, 10, 30))
        );

        form.set_start(Some(at(2024, 3, 2, 14, 0)));
        assert_eq!(
            form.open().expect("open").draft.end,
            Some(at(2024, 3, 2, 15, 30))
        );
    }

    #[test]
    fn end_is_unset_while_start_is_unset() {
        let mut form = AppointmentForm::new();
        form.open_create(at(2024, 3, 1, 9, 0), 50);
        form.set_start(None);

        let open = form.open().expect("open");
        assert_eq!(open.draft.end, None);

        // A length change against an unset start must not resurrect the end.
        form.set_length(30);
        assert_eq!(form.open().expect("open").draft.end, None);
    }

    #[test]
    fn edit_mode_copies_every_field_before_enrichment() {
        let appointment = saved_appointment();
        let mut form = AppointmentForm::new();
        let plan = form.open_edit(&appointment);

        let open = form.open().expect("form open");
        assert_eq!(open.mode, FormMode::Edit(appointment.id));
        assert_eq!(open.draft.title, appointment.title);
        assert_eq!(open.draft.start, Some(appointment.start));
        assert_eq!(open.draft.end, Some(appointment.end));
        assert_eq!(open.draft.length_minutes, appointment.length_minutes);
        assert_eq!(open.draft.client_id, appointment.client_id);
        assert_eq!(open.draft.kind, appointment.kind);
        assert!(open.selected_client.is_none());
        assert!(open.note.is_none());

        assert_eq!(plan.appointment_id, appointment.id);
        assert_eq!(plan.client_id, appointment.client_id);
        assert_eq!(plan.generation, form.generation());
    }

    #[test]
    fn client_enrichment_derives_first_name_last_initial() {
        let appointment = saved_appointment();
        let mut form = AppointmentForm::new();
        let plan = form.open_edit(&appointment);

        form.apply_client(plan.generation, client("Ana", "Lopez"));
        assert_eq!(form.open().expect("open").draft.title, "Ana L.");
    }

    #[test]
    fn stale_client_enrichment_is_dropped() {
        let first = saved_appointment();
        let second = saved_appointment();
        let mut form = AppointmentForm::new();
        let stale_plan = form.open_edit(&first);
        form.close();
        form.open_edit(&second);

        form.apply_client(stale_plan.generation, client("Old", "Record"));
        let open = form.open().expect("open");
        assert!(open.selected_client.is_none());
        assert_eq!(open.draft.title, second.title);
    }

    #[test]
    fn enrichment_lands_on_the_dispatched_open_state_not_an_older_copy() {
        // The UI holds form values by snapshot; enrichment must be applied
        // to the value that opened the edit, not to a copy taken before.
        let appointment = saved_appointment();
        let mut form = AppointmentForm::new();
        let mut pre_open_copy = form.clone();
        let plan = form.open_edit(&appointment);

        form.apply_client(plan.generation, client("Ana", "Lopez"));
        form.apply_note(plan.generation, None);
        assert!(form.is_open());
        assert_eq!(form.open().expect("open").draft.title, "Ana L.");

        // Applied to the older copy, the same results are refused: its
        // generation predates the plan's and it never opened.
        pre_open_copy.apply_client(plan.generation, client("Ana", "Lopez"));
        pre_open_copy.apply_note(plan.generation, None);
        assert!(!pre_open_copy.is_open());
    }

    #[test]
    fn enrichment_never_overwrites_a_touched_title() {
        let appointment = saved_appointment();
        let mut form = AppointmentForm::new();
        let plan = form.open_edit(&appointment);

        form.set_kind(AppointmentKind::Other);
        form.set_title("Team supervision");
        form.set_kind(AppointmentKind::Client);

        form.apply_client(plan.generation, client("Ana", "Lopez"));
        assert_eq!(form.open().expect("open").draft.title, "Team supervision");
    }

    #[test]
    fn enrichment_never_overrides_a_user_chosen_client() {
        let appointment = saved_appointment();
        let mut form = AppointmentForm::new();
        let plan = form.open_edit(&appointment);

        let chosen = client("Ben", "Okafor");
        form.select_client(Some(chosen.clone()));
        form.apply_client(plan.generation, client("Ana", "Lopez"));

        let open = form.open().expect("open");
        assert_eq!(open.selected_client, Some(chosen));
        assert_eq!(open.draft.title, "Ben O.");
    }

    #[test]
    fn other_kind_title_ignores_client_selection() {
        let mut form = AppointmentForm::new();
        form.open_create(at(2024, 3, 1, 9, 0), 50);
        form.set_kind(AppointmentKind::Other);
        form.set_title("Billing hour");

        form.select_client(Some(client("Ana", "Lopez")));
        assert_eq!(form.open().expect("open").draft.title, "Billing hour");
    }

    #[test]
    fn toggling_to_other_keeps_the_selected_client() {
        let mut form = AppointmentForm::new();
        form.open_create(at(2024, 3, 1, 9, 0), 50);
        let picked = client("Ana", "Lopez");
        form.select_client(Some(picked.clone()));

        form.set_kind(AppointmentKind::Other);
        let open = form.open().expect("open");
        assert_eq!(open.selected_client, Some(picked.clone()));
        assert_eq!(open.draft.client_id, Some(picked.id));
    }

    #[test]
    fn submit_without_id_creates_and_with_id_updates() {
        let therapist = Uuid::new_v4();

        let mut form = AppointmentForm::new();
        form.open_create(at(2024, 3, 1, 9, 0), 50);
        form.set_kind(AppointmentKind::Other);
        form.set_title("Intake paperwork");
        match form.submit_action(therapist).expect("submit") {
            SubmitAction::Create(payload) => {
                assert_eq!(payload.appointment_id, None);
                assert_eq!(payload.therapist_id, therapist);
                assert_eq!(payload.end, at(2024, 3, 1, 9, 50));
            }
            SubmitAction::Update(_) => panic!("create draft must dispatch create"),
        }

        let appointment = saved_appointment();
        let mut form = AppointmentForm::new();
        form.open_edit(&appointment);
        match form.submit_action(therapist).expect("submit") {
            SubmitAction::Update(payload) => {
                assert_eq!(payload.appointment_id, Some(appointment.id));
            }
            SubmitAction::Create(_) => panic!("edit draft must dispatch update"),
        }
    }

    #[test]
    fn submit_requires_title_and_start() {
        let therapist = Uuid::new_v4();
        let mut form = AppointmentForm::new();
        form.open_create(at(2024, 3, 1, 9, 0), 50);
        assert!(form.submit_action(therapist).is_err());

        form.set_title("Hold");
        form.set_start(None);
        assert!(form.submit_action(therapist).is_err());
    }

    #[test]
    fn delete_is_blocked_by_a_signed_note() {
        let appointment = saved_appointment();
        let mut form = AppointmentForm::new();
        let plan = form.open_edit(&appointment);
        form.apply_note(
            plan.generation,
            Some(Note {
                id: Uuid::new_v4(),
                appointment_id: appointment.id,
                body: String::new(),
                signed_by_therapist: true,
            }),
        );

        assert_eq!(form.delete_decision(), Some(DeleteDecision::Blocked));
    }

    #[test]
    fn delete_proceeds_without_a_signed_note() {
        let appointment = saved_appointment();
        let mut form = AppointmentForm::new();
        let plan = form.open_edit(&appointment);
        assert_eq!(
            form.delete_decision(),
            Some(DeleteDecision::Proceed(appointment.id))
        );

        form.apply_note(
            plan.generation,
            Some(Note {
                id: Uuid::new_v4(),
                appointment_id: appointment.id,
                body: String::new(),
                signed_by_therapist: false,
            }),
        );
        assert_eq!(
            form.delete_decision(),
            Some(DeleteDecision::Proceed(appointment.id))
        );
    }

    #[test]
    fn delete_is_unavailable_in_create_mode() {
        let mut form = AppointmentForm::new();
        form.open_create(at(2024, 3, 1, 9, 0), 50);
        assert_eq!(form.delete_decision(), None);
    }

    #[test]
    fn close_resets_the_draft() {
        let appointment = saved_appointment();
        let mut form = AppointmentForm::new();
        form.open_edit(&appointment);
        form.close();
        assert!(!form.is_open());
        assert!(form.submit_action(Uuid::new_v4()).is_err());
    }
}

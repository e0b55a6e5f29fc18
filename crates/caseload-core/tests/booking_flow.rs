use caseload_core::appointment::{Appointment, AppointmentKind, Client, Note};
use caseload_core::datastore::DataStore;
use caseload_core::form::{AppointmentForm, DeleteDecision, SubmitAction};
use chrono::{Duration, TimeZone, Utc};
use tempfile::tempdir;
use uuid::Uuid;

#[test]
fn datastore_roundtrip_and_booking_flow() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    let therapist = store.load_or_init_therapist().expect("init therapist");
    // A second load must return the same identity, not mint a new one.
    assert_eq!(
        store.load_or_init_therapist().expect("reload therapist").id,
        therapist.id
    );

    let client = Client {
        id: Uuid::new_v4(),
        first_name: "Ana".to_string(),
        last_name: "Lopez".to_string(),
    };
    store.save_clients(&[client.clone()]).expect("save clients");

    // Book a session through the form, the way the modal does.
    let seed = Utc
        .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .expect("valid seed");
    let mut form = AppointmentForm::new();
    form.open_create(seed, 50);
    form.select_client(Some(client.clone()));

    let payload = match form.submit_action(therapist.id).expect("submit") {
        SubmitAction::Create(payload) => payload,
        SubmitAction::Update(_) => panic!("fresh draft must create"),
    };
    assert_eq!(payload.title, "Ana L.");
    assert_eq!(payload.end, seed + Duration::minutes(50));

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        title: payload.title.clone(),
        start: payload.start,
        end: payload.end,
        length_minutes: payload.length_minutes,
        client_id: payload.client_id,
        therapist_id: payload.therapist_id,
        kind: payload.kind,
        created: now,
        modified: now,
    };
    store
        .save_appointments(&[appointment.clone()])
        .expect("save appointments");

    let loaded = store.load_appointments().expect("load appointments");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], appointment);

    // Reopen for editing; enrichment comes from the stored records.
    let mut form = AppointmentForm::new();
    let plan = form.open_edit(&loaded[0]);
    let stored_client = store
        .client_by_id(plan.client_id.expect("client id"))
        .expect("lookup client")
        .expect("client exists");
    form.apply_client(plan.generation, stored_client);
    let note = store
        .note_for_appointment(plan.appointment_id)
        .expect("lookup note");
    assert!(note.is_none());
    form.apply_note(plan.generation, note);

    assert_eq!(
        form.delete_decision(),
        Some(DeleteDecision::Proceed(appointment.id))
    );

    // A signed note flips the decision to a refusal.
    store
        .save_notes(&[Note {
            id: Uuid::new_v4(),
            appointment_id: appointment.id,
            body: "session summary".to_string(),
            signed_by_therapist: true,
        }])
        .expect("save notes");
    let signed = store
        .note_for_appointment(appointment.id)
        .expect("lookup note");
    form.apply_note(plan.generation, signed);
    assert_eq!(form.delete_decision(), Some(DeleteDecision::Blocked));
}

#[test]
fn signed_note_blocks_delete_at_the_datastore() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        title: "Ana L.".to_string(),
        start: now,
        end: now + Duration::minutes(50),
        length_minutes: 50,
        client_id: Some(Uuid::new_v4()),
        therapist_id: Uuid::new_v4(),
        kind: AppointmentKind::Client,
        created: now,
        modified: now,
    };
    store
        .save_appointments(&[appointment.clone()])
        .expect("save appointments");
    store
        .save_notes(&[Note {
            id: Uuid::new_v4(),
            appointment_id: appointment.id,
            body: "session summary".to_string(),
            signed_by_therapist: true,
        }])
        .expect("save notes");

    // Refused while the note is signed; the record must survive.
    assert!(store.delete_appointment(appointment.id).is_err());
    assert_eq!(store.load_appointments().expect("load").len(), 1);

    // Unsigning the note lifts the refusal.
    store
        .save_notes(&[Note {
            id: Uuid::new_v4(),
            appointment_id: appointment.id,
            body: "session summary".to_string(),
            signed_by_therapist: false,
        }])
        .expect("save notes");
    store
        .delete_appointment(appointment.id)
        .expect("delete appointment");
    assert!(store.load_appointments().expect("load").is_empty());

    // Deleting an id that is gone reports an error.
    assert!(store.delete_appointment(appointment.id).is_err());
}

#[test]
fn appointment_kinds_survive_serialization() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    let now = Utc::now();
    let other = Appointment {
        id: Uuid::new_v4(),
        title: "Team supervision".to_string(),
        start: now,
        end: now + Duration::minutes(90),
        length_minutes: 90,
        client_id: None,
        therapist_id: Uuid::new_v4(),
        kind: AppointmentKind::Other,
        created: now,
        modified: now,
    };
    store.save_appointments(&[other]).expect("save");

    let loaded = store.load_appointments().expect("load");
    assert_eq!(loaded[0].kind, AppointmentKind::Other);
    assert_eq!(loaded[0].client_id, None);
}

use caseload_gui_shared::{
    AppointmentCreate, AppointmentDto, AppointmentIdArg, AppointmentUpdateArgs,
    AppointmentsListArgs, ClientDto, ClientIdArg, NoteDto, SessionDto,
};
use serde::Deserialize;
use tauri::State;
use tracing::{info, instrument};

use crate::state::AppState;

fn err_to_string(err: anyhow::Error) -> String {
    err.to_string()
}

#[tauri::command]
#[instrument(skip(state))]
pub async fn session_get(state: State<'_, AppState>) -> Result<SessionDto, String> {
    state.session().map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state), fields(from = ?args.from, to = ?args.to))]
pub async fn appointments_list(
    state: State<'_, AppState>,
    args: AppointmentsListArgs,
) -> Result<Vec<AppointmentDto>, String> {
    state.list(args).map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state, create), fields(kind = ?create.kind))]
pub async fn appointment_create(
    state: State<'_, AppState>,
    create: AppointmentCreate,
) -> Result<AppointmentDto, String> {
    state.create(create).map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state, args), fields(id = %args.id))]
pub async fn appointment_update(
    state: State<'_, AppState>,
    args: AppointmentUpdateArgs,
) -> Result<AppointmentDto, String> {
    state.update(args).map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state), fields(id = %arg.id))]
pub async fn appointment_delete(
    state: State<'_, AppState>,
    arg: AppointmentIdArg,
) -> Result<(), String> {
    state.delete(arg.id).map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state))]
pub async fn clients_list(state: State<'_, AppState>) -> Result<Vec<ClientDto>, String> {
    state.clients().map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state), fields(id = %arg.id))]
pub async fn client_get(state: State<'_, AppState>, arg: ClientIdArg) -> Result<ClientDto, String> {
    state.client(arg.id).map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state), fields(id = %arg.id))]
pub async fn note_get_by_appointment(
    state: State<'_, AppState>,
    arg: AppointmentIdArg,
) -> Result<Option<NoteDto>, String> {
    state.note_for_appointment(arg.id).map_err(err_to_string)
}

#[derive(Debug, Deserialize)]
pub struct UiLogArg {
    pub event: String,
    pub detail: String,
}

#[tauri::command]
#[instrument(fields(event = %args.event))]
pub async fn ui_log(args: UiLogArg) -> Result<(), String> {
    info!(event = %args.event, detail = %args.detail, "ui interaction");
    Ok(())
}

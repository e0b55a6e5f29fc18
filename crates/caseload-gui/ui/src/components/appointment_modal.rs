use caseload_core::appointment::AppointmentKind;
use caseload_core::form::{AppointmentForm, FormMode};
use caseload_gui_shared::ClientDto;
use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use uuid::Uuid;
use yew::{
    Callback, Html, MouseEvent, Properties, TargetCast, UseStateHandle, classes,
    function_component, html,
};

use crate::app::schedule::client_from_dto;

const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Properties, PartialEq)]
pub struct AppointmentModalProps {
    pub form: UseStateHandle<AppointmentForm>,
    pub busy: bool,
    pub clients: Vec<ClientDto>,
    pub timezone: Tz,
    pub on_submit: Callback<MouseEvent>,
    pub on_close: Callback<MouseEvent>,
    pub on_delete_request: Callback<MouseEvent>,
}

#[function_component(AppointmentModal)]
pub fn appointment_modal(props: &AppointmentModalProps) -> Html {
    let form = props.form.clone();
    let Some(open) = form.open().cloned() else {
        return html! {};
    };

    let timezone = props.timezone;
    let is_edit = matches!(open.mode, FormMode::Edit(_));
    let is_busy = props.busy;

    let start_value = open
        .draft
        .start
        .map(|start| {
            start
                .with_timezone(&timezone)
                .format(DATETIME_INPUT_FORMAT)
                .to_string()
        })
        .unwrap_or_default();
    let end_display = open
        .draft
        .end
        .map(|end| end.with_timezone(&timezone).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());
    let length_value = open.draft.length_minutes.to_string();
    let client_value = open
        .draft
        .client_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    let signed_note = open
        .note
        .as_ref()
        .is_some_and(|note| note.signed_by_therapist);

    let on_kind_change = |kind: AppointmentKind| {
        let form = form.clone();
        Callback::from(move |_: web_sys::Event| {
            let mut next = (*form).clone();
            next.set_kind(kind);
            form.set(next);
        })
    };

    let on_client_change = {
        let form = form.clone();
        let clients = props.clients.clone();
        Callback::from(move |e: web_sys::Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            let value = select.value();
            let mut next = (*form).clone();
            if value.is_empty() {
                next.select_client(None);
            } else if let Ok(id) = value.parse::<Uuid>() {
                let picked = clients
                    .iter()
                    .find(|client| client.id == id)
                    .cloned()
                    .map(client_from_dto);
                next.select_client(picked);
            }
            form.set(next);
        })
    };

    let on_title_input = {
        let form = form.clone();
        Callback::from(move |e: web_sys::InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.set_title(&input.value());
            form.set(next);
        })
    };

    let on_start_change = {
        let form = form.clone();
        Callback::from(move |e: web_sys::Event| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            let mut next = (*form).clone();
            if value.is_empty() {
                next.set_start(None);
            } else if let Ok(naive) = NaiveDateTime::parse_from_str(&value, DATETIME_INPUT_FORMAT)
                && let Some(local) = timezone.from_local_datetime(&naive).earliest()
            {
                next.set_start(Some(local.with_timezone(&Utc)));
            }
            form.set(next);
        })
    };

    let on_length_input = {
        let form = form.clone();
        Callback::from(move |e: web_sys::InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            if let Ok(minutes) = input.value().parse::<i64>() {
                let mut next = (*form).clone();
                next.set_length(minutes);
                form.set(next);
            }
        })
    };

    html! {
        <div class="modal-backdrop" onclick={props.on_close.clone()}>
            <div class="modal appointment-modal" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <div class="header">
                    { if is_edit { "Edit Appointment" } else { "New Appointment" } }
                    {
                        if is_edit {
                            html! {
                                <button
                                    type="button"
                                    class="btn danger modal-delete-btn"
                                    title="Delete appointment"
                                    onclick={props.on_delete_request.clone()}
                                    disabled={is_busy}
                                >
                                    { "Delete" }
                                </button>
                            }
                        } else {
                            html! {}
                        }
                    }
                </div>
                <div class="content">
                    <div class="field">
                        <label>{ "Appointment Type" }</label>
                        <div class="field-inline">
                            <label class="radio-label">
                                <input
                                    type="radio"
                                    name="appointment-kind"
                                    checked={open.draft.kind == AppointmentKind::Client}
                                    onchange={on_kind_change(AppointmentKind::Client)}
                                />
                                { "Client session" }
                            </label>
                            <label class="radio-label">
                                <input
                                    type="radio"
                                    name="appointment-kind"
                                    checked={open.draft.kind == AppointmentKind::Other}
                                    onchange={on_kind_change(AppointmentKind::Other)}
                                />
                                { "Other" }
                            </label>
                        </div>
                    </div>
                    {
                        if open.draft.kind == AppointmentKind::Client {
                            html! {
                                <div class="field">
                                    <label>{ "Client" }</label>
                                    <select class="client-select" value={client_value} onchange={on_client_change}>
                                        <option value="">{ "Select client" }</option>
                                        {
                                            for props.clients.iter().map(|client| html! {
                                                <option value={client.id.to_string()}>
                                                    { format!("{} {}", client.first_name, client.last_name) }
                                                </option>
                                            })
                                        }
                                    </select>
                                    <div class="field-help">
                                        { format!("Calendar title: {}", if open.draft.title.is_empty() { "(none)" } else { &open.draft.title }) }
                                    </div>
                                </div>
                            }
                        } else {
                            html! {
                                <div class="field">
                                    <label>{ "Title" }</label>
                                    <input
                                        value={open.draft.title.clone()}
                                        placeholder="e.g. Supervision, Team meeting"
                                        oninput={on_title_input}
                                    />
                                </div>
                            }
                        }
                    }
                    <div class="field">
                        <label>{ "Start" }</label>
                        <input
                            type="datetime-local"
                            value={start_value}
                            onchange={on_start_change}
                        />
                    </div>
                    <div class="field">
                        <label>{ "Length (minutes)" }</label>
                        <div class="field-inline">
                            <input
                                type="number"
                                min="5"
                                step="5"
                                value={length_value}
                                oninput={on_length_input}
                            />
                            <span class="field-help">{ format!("Ends at {end_display}") }</span>
                        </div>
                    </div>
                    {
                        if signed_note {
                            html! {
                                <div class="field-help note-signed-hint">
                                    { "A signed session note is attached to this appointment." }
                                </div>
                            }
                        } else {
                            html! {}
                        }
                    }
                    {
                        if let Some(error) = open.error.as_ref() {
                            html! { <div class="modal-error">{ error.clone() }</div> }
                        } else {
                            html! {}
                        }
                    }
                </div>
                <div class="footer">
                    <button
                        class="btn"
                        type="button"
                        onclick={props.on_close.clone()}
                        disabled={is_busy}
                    >
                        { "Cancel" }
                    </button>
                    <button
                        class={classes!("btn", "primary")}
                        type="button"
                        onclick={props.on_submit.clone()}
                        disabled={is_busy}
                    >
                        { if is_busy { "Saving..." } else { "Done" } }
                    </button>
                </div>
            </div>
        </div>
    }
}

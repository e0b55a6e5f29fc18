pub mod schedule;
pub mod storage;

use caseload_core::appointment::DEFAULT_LENGTH_MINUTES;
use caseload_core::form::{
  AppointmentForm,
  DeleteDecision,
  SubmitAction
};
use caseload_core::schedule::{
  add_days,
  shift_weeks,
  slot_seed,
  start_of_week,
  today_in_timezone,
  week_days
};
use caseload_gui_shared::{
  AppointmentDto,
  AppointmentIdArg,
  AppointmentUpdateArgs,
  AppointmentsListArgs,
  ClientDto,
  ClientIdArg,
  NoteDto,
  PracticeSettingsDto,
  SessionDto
};
use chrono::{
  NaiveDate,
  Utc,
  Weekday
};
use chrono_tz::Tz;
use gloo::console::log;
use wasm_bindgen_futures::spawn_local;
use yew::{
  Callback,
  Html,
  MouseEvent,
  classes,
  function_component,
  html,
  use_effect_with,
  use_state
};

use crate::api::invoke_tauri;
use crate::components::{
  AppointmentModal,
  DeleteConfirmModal,
  ScheduleGrid,
  ScheduleNav
};
use schedule::{
  ScheduleEvent,
  appointment_from_event,
  client_from_dto,
  collect_events,
  create_from_payload,
  note_from_dto
};
use storage::{
  ScheduleViewMode,
  ThemeMode
};

const DELETE_BLOCKED_NOTICE: &str = "This appointment has a signed session note and \
     cannot be deleted. If this looks wrong, contact your practice administrator.";

#[function_component(App)]
pub fn app() -> Html {
    let session = use_state(|| None::<SessionDto>);
    let appointments = use_state(Vec::<AppointmentDto>::new);
    let refresh_tick = use_state(|| 0_u64);
    let form = use_state(AppointmentForm::new);
    let modal_busy = use_state(|| false);
    let delete_confirm = use_state(|| false);
    let notice = use_state(|| None::<String>);
    let view_mode = use_state(storage::load_schedule_view);
    let theme = use_state(storage::load_theme_mode);
    let focus_date = use_state(|| Utc::now().date_naive());

    {
        let session = session.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match invoke_tauri::<SessionDto, _>("session_get", &serde_json::json!({})).await {
                    Ok(loaded) => session.set(Some(loaded)),
                    Err(err) => tracing::error!(error = %err, "session_get failed"),
                }
            });
            || ()
        });
    }

    {
        let appointments = appointments.clone();
        use_effect_with(*refresh_tick, move |_| {
            spawn_local(async move {
                let args = AppointmentsListArgs {
                    from: None,
                    to: None,
                };
                match invoke_tauri::<Vec<AppointmentDto>, _>(
                    "appointments_list",
                    &serde_json::json!({ "args": args }),
                )
                .await
                {
                    Ok(list) => {
                        tracing::debug!(total = list.len(), "appointments refreshed");
                        appointments.set(list);
                    }
                    Err(err) => tracing::error!(error = %err, "appointments_list failed"),
                }
            });
            || ()
        });
    }

    use_effect_with(*view_mode, move |mode| {
        storage::save_schedule_view(*mode);
        || ()
    });
    use_effect_with(*theme, move |theme| {
        storage::save_theme_mode(*theme);
        || ()
    });

    let settings = (*session).as_ref().map(|s| s.settings.clone());
    let timezone: Tz = settings
        .as_ref()
        .and_then(|s| s.timezone.parse().ok())
        .unwrap_or(chrono_tz::UTC);
    let default_length = settings
        .as_ref()
        .map(|s| s.default_length_minutes)
        .unwrap_or(DEFAULT_LENGTH_MINUTES);
    let day_start_hour = settings.as_ref().map(|s| s.day_start_hour).unwrap_or(8);
    let day_end_hour = settings.as_ref().map(|s| s.day_end_hour).unwrap_or(18);
    let week_start_day = week_start_from(settings.as_ref());
    let clients = (*session)
        .as_ref()
        .map(|s| s.clients.clone())
        .unwrap_or_default();

    let week_start_date = start_of_week(*focus_date, week_start_day);
    let days: Vec<NaiveDate> = match *view_mode {
        ScheduleViewMode::Week => week_days(*focus_date, week_start_day).to_vec(),
        ScheduleViewMode::Day => vec![*focus_date],
    };
    let events = collect_events(&appointments);

    let on_slot_select = {
        let form = form.clone();
        let notice = notice.clone();
        Callback::from(move |(day, hour): (NaiveDate, u32)| {
            let Some(seed) = slot_seed(day, hour, timezone) else {
                tracing::warn!(%day, hour, "slot has no valid local instant");
                return;
            };
            let mut next = (*form).clone();
            next.open_create(seed, default_length);
            form.set(next);
            notice.set(None);
            ui_debug("schedule.slot.click", &format!("{day} {hour:02}:00"));
        })
    };

    let on_add_click = {
        let form = form.clone();
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| {
            let today = today_in_timezone(timezone);
            let Some(seed) = slot_seed(today, day_start_hour, timezone) else {
                tracing::warn!(%today, day_start_hour, "no valid opening slot today");
                return;
            };
            let mut next = (*form).clone();
            next.open_create(seed, default_length);
            form.set(next);
            notice.set(None);
            ui_debug("topbar.add.click", "opened blank appointment form");
        })
    };

    let on_event_select = {
        let form = form.clone();
        let notice = notice.clone();
        Callback::from(move |event: ScheduleEvent| {
            let appointment = appointment_from_event(&event);
            let mut next = (*form).clone();
            let plan = next.open_edit(&appointment);
            form.set(next.clone());
            notice.set(None);
            ui_debug("schedule.event.click", &format!("editing {}", plan.appointment_id));

            // Inside the future the state handle still derefs to the
            // pre-open render snapshot, so enrichment lands on the opened
            // value captured here. Both lookups resolve before the single
            // write, and the generation/touched guards gate what applies.
            let form = form.clone();
            spawn_local(async move {
                let client = match plan.client_id {
                    Some(id) => invoke_tauri::<ClientDto, _>(
                        "client_get",
                        &serde_json::json!({ "arg": ClientIdArg { id } }),
                    )
                    .await
                    .map_err(|err| tracing::debug!(error = %err, "client enrichment failed"))
                    .ok(),
                    None => None,
                };
                let note = invoke_tauri::<Option<NoteDto>, _>(
                    "note_get_by_appointment",
                    &serde_json::json!({ "arg": AppointmentIdArg { id: plan.appointment_id } }),
                )
                .await
                .unwrap_or_else(|err| {
                    tracing::debug!(error = %err, "note enrichment failed");
                    None
                });

                let mut opened = next;
                if let Some(client) = client {
                    opened.apply_client(plan.generation, client_from_dto(client));
                }
                opened.apply_note(plan.generation, note.map(note_from_dto));
                form.set(opened);
            });
        })
    };

    let on_modal_close = {
        let form = form.clone();
        let delete_confirm = delete_confirm.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*form).clone();
            next.close();
            form.set(next);
            delete_confirm.set(false);
        })
    };

    let on_modal_submit = {
        let form = form.clone();
        let modal_busy = modal_busy.clone();
        let refresh_tick = refresh_tick.clone();
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            if *modal_busy {
                return;
            }
            let Some(therapist_id) = (*session).as_ref().map(|s| s.therapist.id) else {
                tracing::warn!("submit attempted before session loaded");
                return;
            };

            let current = (*form).clone();
            match current.submit_action(therapist_id) {
                Err(message) => {
                    let mut next = current;
                    next.set_error(message);
                    form.set(next);
                }
                Ok(action) => {
                    modal_busy.set(true);
                    ui_debug("modal.save.click", "dispatching appointment save");
                    let form = form.clone();
                    let modal_busy = modal_busy.clone();
                    let refresh_tick = refresh_tick.clone();
                    spawn_local(async move {
                        let result = match action {
                            SubmitAction::Create(payload) => {
                                let create = create_from_payload(&payload);
                                invoke_tauri::<AppointmentDto, _>(
                                    "appointment_create",
                                    &serde_json::json!({ "create": create }),
                                )
                                .await
                                .map(|_| ())
                            }
                            SubmitAction::Update(payload) => match payload.appointment_id {
                                Some(id) => {
                                    let args = AppointmentUpdateArgs {
                                        id,
                                        payload: create_from_payload(&payload),
                                    };
                                    invoke_tauri::<AppointmentDto, _>(
                                        "appointment_update",
                                        &serde_json::json!({ "args": args }),
                                    )
                                    .await
                                    .map(|_| ())
                                }
                                None => Err("update payload missing appointment id".to_string()),
                            },
                        };

                        match result {
                            Ok(()) => {
                                let mut next = (*form).clone();
                                next.close();
                                form.set(next);
                                refresh_tick.set(*refresh_tick + 1);
                            }
                            Err(err) => {
                                tracing::error!(error = %err, "appointment save failed");
                                let mut next = (*form).clone();
                                next.set_error(format!("Save failed: {err}"));
                                form.set(next);
                            }
                        }
                        modal_busy.set(false);
                    });
                }
            }
        })
    };

    let on_delete_request = {
        let delete_confirm = delete_confirm.clone();
        Callback::from(move |_: MouseEvent| {
            delete_confirm.set(true);
        })
    };

    let on_delete_cancel = {
        let delete_confirm = delete_confirm.clone();
        Callback::from(move |_: MouseEvent| {
            delete_confirm.set(false);
        })
    };

    let on_delete_confirm = {
        let form = form.clone();
        let modal_busy = modal_busy.clone();
        let refresh_tick = refresh_tick.clone();
        let delete_confirm = delete_confirm.clone();
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| {
            delete_confirm.set(false);
            match (*form).delete_decision() {
                None => {}
                Some(DeleteDecision::Blocked) => {
                    ui_debug("modal.delete.blocked", "signed note refusal");
                    notice.set(Some(DELETE_BLOCKED_NOTICE.to_string()));
                    let mut next = (*form).clone();
                    next.close();
                    form.set(next);
                }
                Some(DeleteDecision::Proceed(id)) => {
                    modal_busy.set(true);
                    let form = form.clone();
                    let modal_busy = modal_busy.clone();
                    let refresh_tick = refresh_tick.clone();
                    spawn_local(async move {
                        match invoke_tauri::<(), _>(
                            "appointment_delete",
                            &serde_json::json!({ "arg": AppointmentIdArg { id } }),
                        )
                        .await
                        {
                            Ok(()) => {
                                let mut next = (*form).clone();
                                next.close();
                                form.set(next);
                                refresh_tick.set(*refresh_tick + 1);
                            }
                            Err(err) => {
                                tracing::error!(error = %err, "appointment delete failed");
                                let mut next = (*form).clone();
                                next.set_error(format!("Delete failed: {err}"));
                                form.set(next);
                            }
                        }
                        modal_busy.set(false);
                    });
                }
            }
        })
    };

    let on_prev = {
        let focus_date = focus_date.clone();
        let view_mode = view_mode.clone();
        Callback::from(move |_: MouseEvent| {
            let next = match *view_mode {
                ScheduleViewMode::Week => shift_weeks(*focus_date, -1),
                ScheduleViewMode::Day => add_days(*focus_date, -1),
            };
            focus_date.set(next);
        })
    };

    let on_next = {
        let focus_date = focus_date.clone();
        let view_mode = view_mode.clone();
        Callback::from(move |_: MouseEvent| {
            let next = match *view_mode {
                ScheduleViewMode::Week => shift_weeks(*focus_date, 1),
                ScheduleViewMode::Day => add_days(*focus_date, 1),
            };
            focus_date.set(next);
        })
    };

    let on_today = {
        let focus_date = focus_date.clone();
        Callback::from(move |_: MouseEvent| {
            focus_date.set(today_in_timezone(timezone));
        })
    };

    let on_view_change = {
        let view_mode = view_mode.clone();
        Callback::from(move |mode: ScheduleViewMode| {
            view_mode.set(mode);
        })
    };

    let on_theme_toggle = {
        let theme = theme.clone();
        Callback::from(move |_: MouseEvent| {
            theme.set(theme.toggled());
        })
    };

    let on_notice_dismiss = {
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| {
            notice.set(None);
        })
    };

    let confirm_title = form
        .open()
        .map(|open| open.draft.title.clone())
        .unwrap_or_default();
    let theme_label = match *theme {
        ThemeMode::Day => "Night mode",
        ThemeMode::Night => "Day mode",
    };

    html! {
        <div class={classes!("app-shell", theme.css_class())}>
            <header class="topbar">
                <div class="brand">{ "Caseload" }</div>
                <div class="topbar-actions">
                    <button type="button" class="btn primary" onclick={on_add_click}>
                        { "Add Appointment" }
                    </button>
                    <button type="button" class="btn" onclick={on_theme_toggle}>
                        { theme_label }
                    </button>
                </div>
            </header>
            {
                if let Some(message) = (*notice).clone() {
                    html! {
                        <div class="notice-banner">
                            <span>{ message }</span>
                            <button type="button" class="btn" onclick={on_notice_dismiss}>
                                { "Dismiss" }
                            </button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            <main class="schedule-workspace">
                <ScheduleNav
                    focus={*focus_date}
                    week_start={week_start_date}
                    view_mode={*view_mode}
                    on_prev={on_prev}
                    on_today={on_today}
                    on_next={on_next}
                    on_view_change={on_view_change}
                />
                <ScheduleGrid
                    events={events}
                    days={days}
                    day_start_hour={day_start_hour}
                    day_end_hour={day_end_hour}
                    timezone={timezone}
                    on_slot_select={on_slot_select}
                    on_event_select={on_event_select}
                />
            </main>
            <AppointmentModal
                form={form.clone()}
                busy={*modal_busy}
                clients={clients}
                timezone={timezone}
                on_submit={on_modal_submit}
                on_close={on_modal_close}
                on_delete_request={on_delete_request}
            />
            <DeleteConfirmModal
                open={*delete_confirm}
                title={confirm_title}
                busy={*modal_busy}
                on_close={on_delete_cancel}
                on_confirm={on_delete_confirm}
            />
        </div>
    }
}

fn week_start_from(settings: Option<&PracticeSettingsDto>) -> Weekday {
    match settings.map(|s| s.week_start.as_str()) {
        Some(raw) if raw.eq_ignore_ascii_case("sunday") => Weekday::Sun,
        _ => Weekday::Mon,
    }
}

fn ui_debug(event: &str, detail: &str) {
    tracing::debug!(event, detail, "ui-debug");
    log!(format!("[ui-debug] {event}: {detail}"));

    let payload = serde_json::json!({
        "args": { "event": event, "detail": detail }
    });
    spawn_local(async move {
        let _ = invoke_tauri::<(), _>("ui_log", &payload).await;
    });
}

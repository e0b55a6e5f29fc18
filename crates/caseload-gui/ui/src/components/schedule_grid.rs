use caseload_core::schedule::{local_day, local_hour};
use chrono::NaiveDate;
use chrono_tz::Tz;
use yew::{Callback, Html, MouseEvent, Properties, classes, function_component, html};

use crate::app::schedule::ScheduleEvent;

#[derive(Properties, PartialEq)]
pub struct ScheduleGridProps {
    pub events: Vec<ScheduleEvent>,
    pub days: Vec<NaiveDate>,
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub timezone: Tz,
    pub on_slot_select: Callback<(NaiveDate, u32)>,
    pub on_event_select: Callback<ScheduleEvent>,
}

#[function_component(ScheduleGrid)]
pub fn schedule_grid(props: &ScheduleGridProps) -> Html {
    // An empty schedule renders nothing; the topbar button is the entry
    // point for the first booking.
    if props.events.is_empty() {
        return html! {};
    }

    let timezone = props.timezone;

    html! {
        <div class={classes!("schedule-grid", (props.days.len() == 1).then_some("schedule-grid-day"))}>
            <div class="schedule-grid-head-row">
                <div class="schedule-grid-hour-head"></div>
                {
                    for props.days.iter().map(|day| html! {
                        <div class="schedule-grid-day-head">
                            { day.format("%a %-d").to_string() }
                        </div>
                    })
                }
            </div>
            {
                for (props.day_start_hour..props.day_end_hour).map(|hour| {
                    html! {
                        <div class="schedule-grid-row">
                            <div class="schedule-grid-hour-label">
                                { format!("{hour:02}:00") }
                            </div>
                            {
                                for props.days.iter().map(|day| {
                                    render_slot(props, *day, hour, timezone)
                                })
                            }
                        </div>
                    }
                })
            }
        </div>
    }
}

fn render_slot(props: &ScheduleGridProps, day: NaiveDate, hour: u32, timezone: Tz) -> Html {
    let slot_events: Vec<ScheduleEvent> = props
        .events
        .iter()
        .filter(|event| {
            local_day(event.start, timezone) == day && local_hour(event.start, timezone) == hour
        })
        .cloned()
        .collect();

    let on_slot_click = {
        let on_slot_select = props.on_slot_select.clone();
        Callback::from(move |_: MouseEvent| on_slot_select.emit((day, hour)))
    };

    html! {
        <div class="schedule-grid-cell" onclick={on_slot_click}>
            {
                for slot_events.into_iter().map(|event| {
                    let on_event_select = props.on_event_select.clone();
                    let event_for_click = event.clone();
                    let time_range = format!(
                        "{} - {}",
                        event.start.with_timezone(&timezone).format("%H:%M"),
                        event.end.with_timezone(&timezone).format("%H:%M"),
                    );
                    html! {
                        <button
                            type="button"
                            class="schedule-event"
                            onclick={Callback::from(move |e: MouseEvent| {
                                e.stop_propagation();
                                on_event_select.emit(event_for_click.clone());
                            })}
                        >
                            <span class="schedule-event-title">{ event.dto.title.clone() }</span>
                            <span class="schedule-event-time">{ time_range }</span>
                        </button>
                    }
                })
            }
        </div>
    }
}

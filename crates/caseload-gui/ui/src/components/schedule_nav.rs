use chrono::NaiveDate;
use yew::{Callback, Html, MouseEvent, Properties, classes, function_component, html};

use crate::app::storage::ScheduleViewMode;

#[derive(Properties, PartialEq)]
pub struct ScheduleNavProps {
    pub focus: NaiveDate,
    pub week_start: NaiveDate,
    pub view_mode: ScheduleViewMode,
    pub on_prev: Callback<MouseEvent>,
    pub on_today: Callback<MouseEvent>,
    pub on_next: Callback<MouseEvent>,
    pub on_view_change: Callback<ScheduleViewMode>,
}

#[function_component(ScheduleNav)]
pub fn schedule_nav(props: &ScheduleNavProps) -> Html {
    let label = match props.view_mode {
        ScheduleViewMode::Week => {
            format!("Week of {}", props.week_start.format("%b %-d, %Y"))
        }
        ScheduleViewMode::Day => props.focus.format("%A, %b %-d, %Y").to_string(),
    };

    let view_button = |mode: ScheduleViewMode, text: &str| {
        let active = props.view_mode == mode;
        let on_view_change = props.on_view_change.clone();
        html! {
            <button
                type="button"
                class={classes!("btn", "view-switch-btn", active.then_some("active"))}
                onclick={Callback::from(move |_| on_view_change.emit(mode))}
            >
                { text.to_string() }
            </button>
        }
    };

    html! {
        <div class="schedule-nav">
            <div class="schedule-nav-period">
                <button type="button" class="btn" onclick={props.on_prev.clone()}>{ "<" }</button>
                <button type="button" class="btn" onclick={props.on_today.clone()}>{ "Today" }</button>
                <button type="button" class="btn" onclick={props.on_next.clone()}>{ ">" }</button>
                <span class="schedule-nav-label">{ label }</span>
            </div>
            <div class="schedule-nav-views">
                { view_button(ScheduleViewMode::Week, "Week") }
                { view_button(ScheduleViewMode::Day, "Day") }
            </div>
        </div>
    }
}

use yew::{Callback, Html, MouseEvent, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct DeleteConfirmModalProps {
    pub open: bool,
    pub title: String,
    pub busy: bool,
    pub on_close: Callback<MouseEvent>,
    pub on_confirm: Callback<MouseEvent>,
}

#[function_component(DeleteConfirmModal)]
pub fn delete_confirm_modal(props: &DeleteConfirmModalProps) -> Html {
    if !props.open {
        return html! {};
    }

    html! {
        <div class="modal-backdrop" onclick={props.on_close.clone()}>
            <div class="modal modal-sm delete-confirm-modal" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <div class="header">{ "Delete Appointment" }</div>
                <div class="content">
                    <div>
                        { format!("Delete appointment '{}'?", props.title) }
                    </div>
                    <div class="field-help">
                        { "This removes the appointment from the schedule for everyone in the practice." }
                    </div>
                </div>
                <div class="footer">
                    <button
                        class="btn"
                        type="button"
                        onclick={props.on_close.clone()}
                        disabled={props.busy}
                    >
                        { "Cancel" }
                    </button>
                    <button
                        class="btn danger"
                        type="button"
                        onclick={props.on_confirm.clone()}
                        disabled={props.busy}
                    >
                        { "Delete" }
                    </button>
                </div>
            </div>
        </div>
    }
}

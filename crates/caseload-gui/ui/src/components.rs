mod appointment_modal;
mod delete_confirm_modal;
mod schedule_grid;
mod schedule_nav;

pub use appointment_modal::AppointmentModal;
pub use delete_confirm_modal::DeleteConfirmModal;
pub use schedule_grid::ScheduleGrid;
pub use schedule_nav::ScheduleNav;

pub mod clock;
pub mod reconcile;
pub mod slots;
pub mod types;
pub mod week;

pub use reconcile::{is_slot_booked, reconcile_slots};
pub use slots::generate_slots;
pub use types::{DayAvailability, TimeSlot};
pub use week::{parse_weekday, project_week, weekday_name, DATE_FORMAT};

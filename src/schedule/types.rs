use serde::{Deserialize, Serialize};

/// A single bookable interval within a doctor's day.
///
/// Slots are ephemeral: they are regenerated on every projection pass and
/// never stored. Times are kept as formatted 12-hour strings because slot
/// identity is string equality against stored appointments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
    pub is_booked: bool,
}

/// One calendar day of a doctor's projected week.
#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub date: String,
    pub day_of_week: String,
    pub slots: Vec<TimeSlot>,
}

impl DayAvailability {
    /// A day with no matching availability window renders as unavailable.
    pub fn is_unavailable(&self) -> bool {
        self.slots.is_empty()
    }
}

use super::clock::{format_time, parse_time};
use super::types::TimeSlot;
use crate::error::BookingError;

/// Fixed appointment length; every availability window is cut into
/// increments of this many minutes.
pub const SLOT_MINUTES: u32 = 30;

/// Expands one availability window into fixed 30-minute bookable slots.
///
/// Walks forward from the window start while the cursor is strictly before
/// the window end. A window whose end does not lie after its start yields
/// no slots at all, so a midnight-crossing window like 11:30 PM-12:30 AM
/// silently produces an empty day rather than an error.
pub fn generate_slots(start_text: &str, end_text: &str) -> Result<Vec<TimeSlot>, BookingError> {
    let start = parse_time(start_text)?.minutes_from_midnight();
    let end = parse_time(end_text)?.minutes_from_midnight();

    let mut slots = Vec::new();
    let mut current = start;
    while current < end {
        let next = current + SLOT_MINUTES;
        slots.push(TimeSlot {
            start_time: format_time(current / 60, current % 60),
            end_time: format_time(next / 60, next % 60),
            is_available: true,
            is_booked: false,
        });
        current = next;
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_working_day_yields_sixteen_slots() {
        let slots = generate_slots("9:00 AM", "5:00 PM").unwrap();
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0].start_time, "9:00 AM");
        assert_eq!(slots[0].end_time, "9:30 AM");
        assert_eq!(slots[15].start_time, "4:30 PM");
        assert_eq!(slots[15].end_time, "5:00 PM");
        assert!(slots.iter().all(|s| s.is_available && !s.is_booked));
    }

    #[test]
    fn zero_length_window_yields_nothing() {
        assert!(generate_slots("9:00 AM", "9:00 AM").unwrap().is_empty());
        assert!(generate_slots("2:30 PM", "2:30 PM").unwrap().is_empty());
    }

    #[test]
    fn midnight_crossing_window_yields_nothing() {
        // No wraparound: 12:30 AM sorts before 11:30 PM, so the walk never
        // starts.
        assert!(generate_slots("11:30 PM", "12:30 AM").unwrap().is_empty());
    }

    #[test]
    fn one_hour_window_yields_two_slots() {
        let slots = generate_slots("9:00 AM", "10:00 AM").unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].start_time, "9:30 AM");
        assert_eq!(slots[1].end_time, "10:00 AM");
    }

    #[test]
    fn malformed_bound_propagates_parse_error() {
        assert!(matches!(
            generate_slots("nine", "5:00 PM"),
            Err(BookingError::InvalidTimeFormat(_))
        ));
    }
}

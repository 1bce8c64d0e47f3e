use chrono::{Datelike, Days, NaiveDate, Weekday};

use super::reconcile::reconcile_slots;
use super::slots::generate_slots;
use super::types::DayAvailability;
use crate::catalog::Doctor;
use crate::error::BookingError;
use crate::ledger::Appointment;

/// Calendar date format used in projections and stored appointments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Full weekday name as it appears in catalog rows and appointment records.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses a weekday name from catalog data. Full names only, any case.
pub fn parse_weekday(text: &str) -> Option<Weekday> {
    match text.trim().to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Projects a doctor's recurring weekly pattern onto the 7 calendar days
/// starting at `reference_date`.
///
/// Each day resolves against the FIRST availability window whose weekday
/// matches; a doctor with two windows for the same weekday only ever has
/// the first one projected. Days with no matching window come back with an
/// empty slot list. Slots are reconciled against the full appointment set,
/// which `is_slot_booked` narrows to this doctor and date.
pub fn project_week(
    doctor: &Doctor,
    appointments: &[Appointment],
    reference_date: NaiveDate,
) -> Result<Vec<DayAvailability>, BookingError> {
    let mut days = Vec::with_capacity(7);
    for offset in 0..7u64 {
        let date = reference_date + Days::new(offset);
        let weekday = date.weekday();
        let date_text = date.format(DATE_FORMAT).to_string();

        let slots = match doctor.schedules.iter().find(|w| w.day_of_week == weekday) {
            Some(window) => {
                let generated = generate_slots(&window.available_at, &window.available_until)?;
                reconcile_slots(&generated, &date_text, &doctor.name, appointments)
            }
            None => Vec::new(),
        };

        days.push(DayAvailability {
            date: date_text,
            day_of_week: weekday_name(weekday).to_string(),
            slots,
        });
    }
    Ok(days)
}

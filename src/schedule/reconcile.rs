use super::types::TimeSlot;
use crate::ledger::Appointment;

/// True iff an appointment occupies exactly this slot for this doctor on
/// this date.
///
/// All four fields compare by exact case-sensitive string equality with no
/// whitespace normalization; a start time spelled differently from the
/// stored one counts as a different time.
pub fn is_slot_booked(
    slot: &TimeSlot,
    date: &str,
    doctor_name: &str,
    appointments: &[Appointment],
) -> bool {
    appointments.iter().any(|a| {
        a.doctor_name == doctor_name
            && a.date == date
            && a.start_time == slot.start_time
            && a.end_time == slot.end_time
    })
}

/// Resolves booking flags for a generated slot list against the current
/// appointment set.
///
/// Returns a fresh list; the input slots are left untouched. Each output
/// slot carries `is_booked` from `is_slot_booked` and `is_available` as its
/// negation, with the time fields unchanged.
pub fn reconcile_slots(
    slots: &[TimeSlot],
    date: &str,
    doctor_name: &str,
    appointments: &[Appointment],
) -> Vec<TimeSlot> {
    slots
        .iter()
        .map(|slot| {
            let booked = is_slot_booked(slot, date, doctor_name, appointments);
            TimeSlot {
                start_time: slot.start_time.clone(),
                end_time: slot.end_time.clone(),
                is_available: !booked,
                is_booked: booked,
            }
        })
        .collect()
}

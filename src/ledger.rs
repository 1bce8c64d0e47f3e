use std::cmp::Reverse;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::catalog::Doctor;
use crate::error::BookingError;
use crate::schedule::DATE_FORMAT;
use crate::store::{JsonStore, APPOINTMENTS_KEY};

/// A confirmed booking.
///
/// `id` is unique per appointment; `(doctor_name, date, start_time)` is
/// unique across the whole ledger. An appointment is only ever created by
/// `AppointmentLedger::book` and destroyed by `AppointmentLedger::cancel`;
/// there is no reschedule or in-place modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub doctor_name: String,
    pub doctor_timezone: String,
    pub date: String,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub booked_at: String,
}

impl Appointment {
    /// Builds a new appointment record with a fresh id and creation stamp.
    pub fn new(
        doctor: &Doctor,
        date: &str,
        day_of_week: &str,
        start_time: &str,
        end_time: &str,
    ) -> Self {
        Appointment {
            id: Uuid::new_v4().to_string(),
            doctor_name: doctor.name.clone(),
            doctor_timezone: doctor.timezone.clone(),
            date: date.to_string(),
            day_of_week: day_of_week.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            booked_at: Local::now().to_rfc3339(),
        }
    }
}

/// Owns the appointment collection for the process lifetime and mirrors it
/// to the durable store after every change.
pub struct AppointmentLedger {
    appointments: Vec<Appointment>,
    store: JsonStore,
}

impl AppointmentLedger {
    /// Loads the ledger from the store. Missing, unreadable, or malformed
    /// stored content starts an empty ledger rather than failing.
    pub fn load(store: JsonStore) -> Self {
        let appointments = match store.read(APPOINTMENTS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Appointment>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    warn!("stored appointments are malformed, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("could not read stored appointments, starting empty: {}", e);
                Vec::new()
            }
        };

        AppointmentLedger {
            appointments,
            store,
        }
    }

    /// All appointments in booking order.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Appointments for one doctor, exact name match.
    pub fn appointments_for(&self, doctor_name: &str) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.doctor_name == doctor_name)
            .cloned()
            .collect()
    }

    /// Books an appointment.
    ///
    /// Fails with `DuplicateSlot` when the doctor already has a booking for
    /// the same date and start time, leaving the ledger unchanged. On
    /// success the appointment is appended and the whole collection is
    /// saved; a failed save keeps the in-memory booking and is only logged,
    /// so memory and disk may diverge until the next successful save.
    pub fn book(&mut self, appointment: Appointment) -> Result<(), BookingError> {
        let taken = self.appointments.iter().any(|a| {
            a.doctor_name == appointment.doctor_name
                && a.date == appointment.date
                && a.start_time == appointment.start_time
        });
        if taken {
            return Err(BookingError::DuplicateSlot {
                doctor_name: appointment.doctor_name,
                date: appointment.date,
                start_time: appointment.start_time,
            });
        }

        self.appointments.push(appointment);
        self.save();
        Ok(())
    }

    /// Cancels an appointment by id, exact case-sensitive match. Removes
    /// exactly one entry and saves; an unknown id leaves the ledger
    /// unchanged.
    pub fn cancel(&mut self, id: &str) -> Result<Appointment, BookingError> {
        let position = self
            .appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        let removed = self.appointments.remove(position);
        self.save();
        Ok(removed)
    }

    /// Appointments not yet in the past, ascending by date.
    ///
    /// The stored date parses to local midnight and compares against the
    /// full current timestamp, so a same-day appointment counts as past for
    /// any time after midnight of that day.
    pub fn upcoming(&self) -> Vec<Appointment> {
        self.split_by_date().0
    }

    /// Appointments already in the past, descending by date.
    pub fn past(&self) -> Vec<Appointment> {
        self.split_by_date().1
    }

    fn split_by_date(&self) -> (Vec<Appointment>, Vec<Appointment>) {
        let now = Local::now().naive_local();
        let mut upcoming = Vec::new();
        let mut past = Vec::new();

        for appointment in &self.appointments {
            match parse_at_midnight(&appointment.date) {
                Some(midnight) if midnight >= now => upcoming.push(appointment.clone()),
                // Unparseable dates land here too
                _ => past.push(appointment.clone()),
            }
        }

        upcoming.sort_by_key(|a| parse_at_midnight(&a.date));
        past.sort_by_key(|a| Reverse(parse_at_midnight(&a.date)));
        (upcoming, past)
    }

    fn save(&self) {
        let payload = match serde_json::to_string(&self.appointments) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("could not serialize appointments, skipping save: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.write(APPOINTMENTS_KEY, &payload) {
            warn!("could not save appointments, keeping in-memory state: {}", e);
        }
    }
}

fn parse_at_midnight(date: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn empty_ledger() -> (tempfile::TempDir, AppointmentLedger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = AppointmentLedger::load(JsonStore::new(dir.path()));
        (dir, ledger)
    }

    fn appointment(doctor: &str, date: &str, start: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4().to_string(),
            doctor_name: doctor.to_string(),
            doctor_timezone: "UTC".to_string(),
            date: date.to_string(),
            day_of_week: "Monday".to_string(),
            start_time: start.to_string(),
            end_time: "9:30 AM".to_string(),
            booked_at: Local::now().to_rfc3339(),
        }
    }

    fn local_date(days_from_today: i64) -> String {
        let today = Local::now().date_naive();
        let date = if days_from_today >= 0 {
            today + Days::new(days_from_today as u64)
        } else {
            today - Days::new((-days_from_today) as u64)
        };
        date.format(DATE_FORMAT).to_string()
    }

    #[test]
    fn double_booking_the_same_slot_fails() {
        let (_dir, mut ledger) = empty_ledger();

        ledger
            .book(appointment("Dr. Smith", "2026-08-10", "9:00 AM"))
            .unwrap();
        let result = ledger.book(appointment("Dr. Smith", "2026-08-10", "9:00 AM"));

        assert!(matches!(result, Err(BookingError::DuplicateSlot { .. })));
        assert_eq!(ledger.appointments().len(), 1);
    }

    #[test]
    fn same_slot_different_doctor_or_date_is_fine() {
        let (_dir, mut ledger) = empty_ledger();

        ledger
            .book(appointment("Dr. Smith", "2026-08-10", "9:00 AM"))
            .unwrap();
        ledger
            .book(appointment("Dr. Jones", "2026-08-10", "9:00 AM"))
            .unwrap();
        ledger
            .book(appointment("Dr. Smith", "2026-08-17", "9:00 AM"))
            .unwrap();
        ledger
            .book(appointment("Dr. Smith", "2026-08-10", "9:30 AM"))
            .unwrap();

        assert_eq!(ledger.appointments().len(), 4);
    }

    #[test]
    fn cancel_removes_exactly_one_and_unknown_id_fails() {
        let (_dir, mut ledger) = empty_ledger();

        let first = appointment("Dr. Smith", "2026-08-10", "9:00 AM");
        let id = first.id.clone();
        ledger.book(first).unwrap();
        ledger
            .book(appointment("Dr. Smith", "2026-08-10", "9:30 AM"))
            .unwrap();

        assert!(matches!(
            ledger.cancel("no-such-id"),
            Err(BookingError::NotFound(_))
        ));
        assert_eq!(ledger.appointments().len(), 2);

        let removed = ledger.cancel(&id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(ledger.appointments().len(), 1);

        // Cancelled is terminal: a second cancel of the same id fails
        assert!(matches!(ledger.cancel(&id), Err(BookingError::NotFound(_))));
    }

    #[test]
    fn bookings_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();

        let mut ledger = AppointmentLedger::load(JsonStore::new(dir.path()));
        ledger
            .book(appointment("Dr. Smith", "2026-08-10", "9:00 AM"))
            .unwrap();

        let reloaded = AppointmentLedger::load(JsonStore::new(dir.path()));
        assert_eq!(reloaded.appointments().len(), 1);
        assert_eq!(reloaded.appointments()[0].doctor_name, "Dr. Smith");
    }

    #[test]
    fn malformed_stored_content_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        store.write(APPOINTMENTS_KEY, "{\"not\": \"an array\"}").unwrap();

        let ledger = AppointmentLedger::load(store);
        assert!(ledger.appointments().is_empty());
    }

    #[test]
    fn a_failing_save_does_not_fail_the_booking() {
        // Using a file as the store directory makes every write fail.
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut ledger = AppointmentLedger::load(JsonStore::new(file.path()));

        ledger
            .book(appointment("Dr. Smith", "2026-08-10", "9:00 AM"))
            .unwrap();
        assert_eq!(ledger.appointments().len(), 1);
    }

    #[test]
    fn upcoming_and_past_split_and_sort_by_date() {
        let (_dir, mut ledger) = empty_ledger();

        ledger
            .book(appointment("Dr. Smith", &local_date(7), "9:00 AM"))
            .unwrap();
        ledger
            .book(appointment("Dr. Smith", &local_date(-1), "9:00 AM"))
            .unwrap();
        ledger
            .book(appointment("Dr. Smith", &local_date(1), "9:00 AM"))
            .unwrap();
        ledger
            .book(appointment("Dr. Smith", &local_date(-8), "9:00 AM"))
            .unwrap();

        let upcoming = ledger.upcoming();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].date, local_date(1));
        assert_eq!(upcoming[1].date, local_date(7));

        let past = ledger.past();
        assert_eq!(past.len(), 2);
        assert_eq!(past[0].date, local_date(-1));
        assert_eq!(past[1].date, local_date(-8));
    }

    #[test]
    fn todays_appointment_counts_as_past_after_midnight() {
        let (_dir, mut ledger) = empty_ledger();

        ledger
            .book(appointment("Dr. Smith", &local_date(0), "11:59 PM"))
            .unwrap();

        // Today-at-midnight is already behind "now", whatever the slot time.
        assert!(ledger.upcoming().is_empty());
        assert_eq!(ledger.past().len(), 1);
    }

    #[test]
    fn appointments_for_filters_by_exact_name() {
        let (_dir, mut ledger) = empty_ledger();

        ledger
            .book(appointment("Dr. Smith", "2026-08-10", "9:00 AM"))
            .unwrap();
        ledger
            .book(appointment("dr. smith", "2026-08-10", "9:00 AM"))
            .unwrap();

        assert_eq!(ledger.appointments_for("Dr. Smith").len(), 1);
        assert_eq!(ledger.appointments_for("Dr. Nobody").len(), 0);
    }
}

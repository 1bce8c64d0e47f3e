use std::path::Path;

use chrono::Weekday;
use csv::Reader;
use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::error::BookingError;
use crate::schedule::{parse_weekday, weekday_name};

/// One row of the raw catalog feed, as delivered by the upstream endpoint
/// or a local CSV file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawScheduleRecord {
    pub name: String,
    pub timezone: String,
    pub day_of_week: String,
    pub available_at: String,
    pub available_until: String,
}

/// A recurring weekly availability window. Multiple windows may exist for
/// the same weekday (morning and afternoon blocks); they are never merged.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityWindow {
    #[serde(serialize_with = "serialize_weekday")]
    pub day_of_week: Weekday,
    pub available_at: String,
    pub available_until: String,
}

/// A doctor with their recurring weekly schedule. Immutable once grouped;
/// the whole catalog is replaced on refresh.
#[derive(Debug, Clone, Serialize)]
pub struct Doctor {
    pub name: String,
    pub timezone: String,
    pub schedules: Vec<AvailabilityWindow>,
}

fn serialize_weekday<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*day))
}

/// Groups raw rows into doctors.
///
/// Doctors keep their first-appearance order and each doctor's windows keep
/// the input row order. Names match case-sensitively, so "Dr. Smith" and
/// "dr. smith" group separately. Rows with an unrecognized weekday are
/// skipped.
pub fn group_doctors(records: &[RawScheduleRecord]) -> Vec<Doctor> {
    let mut doctors: Vec<Doctor> = Vec::new();

    for record in records {
        let day = match parse_weekday(&record.day_of_week) {
            Some(day) => day,
            None => {
                warn!(
                    "skipping schedule row for {} with unknown weekday '{}'",
                    record.name, record.day_of_week
                );
                continue;
            }
        };

        let window = AvailabilityWindow {
            day_of_week: day,
            available_at: record.available_at.clone(),
            available_until: record.available_until.clone(),
        };

        match doctors.iter_mut().find(|d| d.name == record.name) {
            Some(doctor) => doctor.schedules.push(window),
            None => doctors.push(Doctor {
                name: record.name.clone(),
                timezone: record.timezone.clone(),
                schedules: vec![window],
            }),
        }
    }

    doctors
}

/// Exact-name doctor lookup.
pub fn find_doctor<'a>(doctors: &'a [Doctor], name: &str) -> Option<&'a Doctor> {
    doctors.iter().find(|d| d.name == name)
}

/// Fetches the raw catalog from the upstream endpoint.
///
/// One attempt, no internal timeout, no retry; cancellation and deadlines
/// belong to the transport. HTTP-level failures carry the status line,
/// transport and body-decoding failures the underlying error text.
pub async fn fetch_doctors(url: &str) -> Result<Vec<RawScheduleRecord>, BookingError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| BookingError::Fetch(format!("Error fetching doctors: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BookingError::Fetch(format!(
            "Failed to fetch doctors: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Error")
        )));
    }

    response
        .json::<Vec<RawScheduleRecord>>()
        .await
        .map_err(|e| BookingError::Fetch(format!("Error fetching doctors: {}", e)))
}

/// Loads catalog rows from a CSV file with a
/// name,timezone,day_of_week,available_at,available_until header.
pub fn load_doctors_csv<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<RawScheduleRecord>, Box<dyn std::error::Error>> {
    let mut reader = Reader::from_path(path)?;
    Ok(collect_rows(&mut reader))
}

/// Parses uploaded CSV bytes into catalog rows.
pub fn parse_doctors_csv(data: &[u8]) -> Vec<RawScheduleRecord> {
    let mut reader = Reader::from_reader(data);
    collect_rows(&mut reader)
}

fn collect_rows<R: std::io::Read>(reader: &mut Reader<R>) -> Vec<RawScheduleRecord> {
    let mut records = Vec::new();
    for row in reader.deserialize::<RawScheduleRecord>() {
        match row {
            Ok(record) => {
                // Skip rows with no usable doctor name
                if record.name.trim().is_empty() {
                    continue;
                }
                records.push(record);
            }
            Err(e) => warn!("skipping malformed catalog row: {}", e),
        }
    }
    records
}

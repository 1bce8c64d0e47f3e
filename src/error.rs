use thiserror::Error;

/// Failures surfaced to the user by the booking engine.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Invalid time format: '{0}'")]
    InvalidTimeFormat(String),

    #[error("{doctor_name} is already booked on {date} at {start_time}")]
    DuplicateSlot {
        doctor_name: String,
        date: String,
        start_time: String,
    },

    #[error("No appointment found with id '{0}'")]
    NotFound(String),

    #[error("{0}")]
    Fetch(String),
}

/// Failures at the durable-store boundary. The ledger decides whether to
/// absorb these (read failure = start empty, write failure = log and
/// continue); they never reach the user directly.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

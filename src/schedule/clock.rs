use crate::error::BookingError;

/// A parsed 12-hour clock time in 24-hour representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn minutes_from_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }
}

/// Parses a 12-hour clock string like "9:00 AM" or "12:30pm".
///
/// All whitespace is stripped first (interior included), then the text must
/// be a 1-2 digit hour, a colon, exactly 2 minute digits, and an AM/PM
/// marker in any case, with nothing else. The hour is not range-checked:
/// "13:00PM" parses to hour 25.
pub fn parse_time(text: &str) -> Result<ClockTime, BookingError> {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let invalid = || BookingError::InvalidTimeFormat(text.to_string());

    if !stripped.is_ascii() || stripped.len() < 3 {
        return Err(invalid());
    }

    let (body, marker) = stripped.split_at(stripped.len() - 2);
    let marker = marker.to_ascii_uppercase();
    if marker != "AM" && marker != "PM" {
        return Err(invalid());
    }

    let (hour_text, minute_text) = body.split_once(':').ok_or_else(invalid)?;
    if hour_text.is_empty()
        || hour_text.len() > 2
        || !hour_text.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    if minute_text.len() != 2 || !minute_text.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut hour: u32 = hour_text.parse().map_err(|_| invalid())?;
    let minute: u32 = minute_text.parse().map_err(|_| invalid())?;

    if marker == "PM" && hour != 12 {
        hour += 12;
    } else if marker == "AM" && hour == 12 {
        hour = 0;
    }

    Ok(ClockTime { hour, minute })
}

/// Formats a 24-hour time as a 12-hour clock string ("9:00 AM").
///
/// The hour is not range-checked either; hour 25 renders as "13:00 PM".
pub fn format_time(hour: u32, minute: u32) -> String {
    let marker = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = if hour == 0 {
        12
    } else if hour > 12 {
        hour - 12
    } else {
        hour
    };
    format!("{}:{:02} {}", display_hour, minute, marker)
}

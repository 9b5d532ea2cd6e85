use chrono::{DateTime, NaiveDate, NaiveTime};

/// Strict `YYYY-MM-DD` calendar date (rejects `2012-02-30`, `2012-2-4`).
pub fn is_calendar_date(input: &str) -> bool {
    input.len() == 10 && NaiveDate::parse_from_str(input, "%Y-%m-%d").is_ok()
}

/// RFC 3339 timestamp with offset (`2012-02-04T10:00:00Z`).
pub fn is_rfc3339_datetime(input: &str) -> bool {
    DateTime::parse_from_rfc3339(input).is_ok()
}

/// `HH:MM:SS` wall-clock time.
pub fn is_wall_time(input: &str) -> bool {
    input.len() == 8 && NaiveTime::parse_from_str(input, "%H:%M:%S").is_ok()
}

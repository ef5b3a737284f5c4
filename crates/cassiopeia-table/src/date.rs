//! Date parsing for date-range filters and chronological ordering.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::value::Timestamp;

// Naive forms are read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a date or date-time string into a [`Timestamp`].
///
/// Accepted forms, tried in order:
/// - RFC 3339 (`2024-01-15T10:00:00Z`, `2024-01-15T10:00:00+03:00`)
/// - RFC 2822 (`Mon, 15 Jan 2024 10:00:00 +0000`)
/// - naive date-times (`2024-01-15 10:00`, `2024-01-15T10:00:00.250`)
/// - plain dates (`2024-01-15`, midnight UTC)
///
/// Returns `None` for anything else, including the empty string.
pub fn parse_date(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Timestamp(dt.timestamp_millis()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(Timestamp(dt.timestamp_millis()));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Timestamp(naive.and_utc().timestamp_millis()));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Timestamp(naive.and_utc().timestamp_millis()))
}

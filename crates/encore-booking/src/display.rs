//! Human-readable show times.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;

use crate::error::BookingError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFormat {
    /// `Tue 05, 21, 2019 9:30PM`
    #[default]
    Medium,
    /// `Tuesday May, 21, 2019 at 9:30PM`
    Full,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
            DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
        }
    }
}

pub fn format_datetime<Tz>(value: &DateTime<Tz>, format: DateFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    value.format(format.pattern()).to_string()
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a submitted start time and normalize it to UTC.
///
/// Accepts RFC 3339, or a date and time without offset which is taken as UTC.
pub fn parse_start_time(raw: &str) -> Result<DateTime<FixedOffset>, BookingError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc).fixed_offset());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| BookingError::ValidationFailed(format!("invalid start_time: {raw:?}")))
}

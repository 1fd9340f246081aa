//! Date-time validation and local-time normalization.
//!
//! Accepted inputs:
//! - RFC 3339 with an offset (`2024-01-01T10:00:00Z`, `...+08:00`)
//! - Minute-precision with an offset (`2024-01-01T10:00Z`)
//! - Naive local forms `YYYY-MM-DDTHH:MM[:SS[.fff]]`, `T` or space separated
//! - A bare date `YYYY-MM-DD` (midnight)
//!
//! The application's canonical form is local `YYYY-MM-DDTHH:MM`.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// A parsed date-time, keeping whether it carried an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDateTime {
    /// An absolute instant.
    Offset(DateTime<FixedOffset>),
    /// Wall-clock time with no zone, taken as already local.
    Naive(NaiveDateTime),
}

impl ParsedDateTime {
    /// Render in the canonical local `YYYY-MM-DDTHH:MM` form.
    pub fn to_local_string(&self) -> String {
        match self {
            ParsedDateTime::Offset(instant) => {
                to_local_datetime_string(&instant.with_timezone(&Local))
            }
            ParsedDateTime::Naive(naive) => naive.format(LOCAL_FORMAT).to_string(),
        }
    }
}

/// Parse any accepted date-time form.
pub fn parse_datetime(input: &str) -> Option<ParsedDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Some(ParsedDateTime::Offset(instant));
    }

    if let Some(naive) = s
        .strip_suffix('Z')
        .or_else(|| s.strip_suffix('z'))
        .and_then(parse_naive)
    {
        let instant = naive.and_utc().fixed_offset();
        return Some(ParsedDateTime::Offset(instant));
    }

    if let Ok(instant) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z") {
        return Some(ParsedDateTime::Offset(instant));
    }

    parse_naive(s).map(ParsedDateTime::Naive)
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// True when `input` is non-empty and parses as a date-time.
pub fn is_valid_datetime(input: &str) -> bool {
    parse_datetime(input).is_some()
}

/// Normalize to local `YYYY-MM-DDTHH:MM`, or `None` if unparsable.
pub fn normalize_local(input: &str) -> Option<String> {
    parse_datetime(input).map(|parsed| parsed.to_local_string())
}

pub fn to_local_datetime_string(instant: &DateTime<Local>) -> String {
    instant.format(LOCAL_FORMAT).to_string()
}

/// Current time in canonical local form (default for a fresh session form).
pub fn now_local_string() -> String {
    to_local_datetime_string(&Utc::now().with_timezone(&Local))
}

//! Timestamp parsing for date-range criteria.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A parsed timestamp and whether it carried only a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed {
    pub at: NaiveDateTime,
    pub date_only: bool,
}

/// Parse a stored or user-supplied timestamp.
///
/// Offsets are normalized to UTC; naive timestamps are taken as-is.
pub fn parse_timestamp(s: &str) -> Option<Parsed> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Parsed {
            at: date.and_hms_opt(0, 0, 0)?,
            date_only: true,
        });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Parsed {
            at: dt.with_timezone(&Utc).naive_utc(),
            date_only: false,
        });
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|at| Parsed {
            at,
            date_only: false,
        })
}

/// Lower bound of a range: date-only values start at midnight.
pub fn lower_bound(s: &str) -> Option<NaiveDateTime> {
    parse_timestamp(s).map(|p| p.at)
}

/// Upper bound of a range: date-only values run through the end of that day.
pub fn upper_bound(s: &str) -> Option<NaiveDateTime> {
    let parsed = parse_timestamp(s)?;
    if parsed.date_only {
        parsed.at.date().and_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        Some(parsed.at)
    }
}

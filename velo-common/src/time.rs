//! Timestamp parsing and combination utilities
//!
//! The remote photo detail carries an instant whose source time zone is
//! unspecified; the console treats it as UTC wall-clock components
//! throughout. Combination never shifts through the local zone.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};

/// Years outside this window are treated as typos, not dates
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Parse a date in either `YYYY-MM-DD` or `DD/MM/YYYY` form.
///
/// Returns None for wrong segment counts, impossible calendar dates, or
/// years outside the sanity window.
pub fn parse_flexible_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()?;
    if date.year() < MIN_YEAR || date.year() > MAX_YEAR {
        return None;
    }
    Some(date)
}

/// Parse a time in either `HH:MM` or `HH:MM:SS` form
pub fn parse_flexible_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// True when the string is a complete, plausible date in either accepted
/// form. Gates the listing auto-resume so a half-typed saved filter never
/// triggers a search.
pub fn is_valid_complete_date(s: &str) -> bool {
    parse_flexible_date(s).is_some()
}

/// Convert a display date (`DD/MM/YYYY`) to input form (`YYYY-MM-DD`)
pub fn to_input_date(display: &str) -> Option<String> {
    let date = parse_flexible_date(display)?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Convert an input date (`YYYY-MM-DD`) to display form (`DD/MM/YYYY`)
pub fn to_display_date(input: &str) -> Option<String> {
    let date = parse_flexible_date(input)?;
    Some(date.format("%d/%m/%Y").to_string())
}

/// Combine decomposed date and time fields into a UTC instant.
///
/// Malformed input falls back to the current instant. The fallback is an
/// explicit documented path, logged at warn level so operators can spot a
/// submission that carried it.
pub fn combine_timestamp(date: &str, time: &str) -> DateTime<Utc> {
    match (parse_flexible_date(date), parse_flexible_time(time)) {
        (Some(d), Some(t)) => Utc.from_utc_datetime(&d.and_time(t)),
        _ => {
            tracing::warn!(
                date,
                time,
                "unparseable timestamp fields, falling back to current instant"
            );
            Utc::now()
        }
    }
}

/// Split a remote ISO-8601-ish timestamp into display date and time fields.
///
/// Used to pre-populate the editable fields when a photo detail loads.
pub fn split_timestamp(timestamp: &str) -> Option<(String, String)> {
    let parsed = DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.naive_utc())
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S")
        })
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S")
        })
        .ok()?;
    Some((
        parsed.format("%d/%m/%Y").to_string(),
        parsed.format("%H:%M:%S").to_string(),
    ))
}

//! Relative time formatting for "last updated" labels.

use chrono::{DateTime, Utc};

/// Format an RFC 3339 timestamp relative to `now`, e.g. "3 days ago".
///
/// Unparseable input is returned unchanged; future timestamps read as
/// "just now".
pub fn relative_past(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };
    let seconds = (now - then.with_timezone(&Utc)).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }
    let (count, unit) = match seconds {
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 30 * 86_400 => (s / 86_400, "day"),
        s if s < 365 * 86_400 => (s / (30 * 86_400), "month"),
        s => (s / (365 * 86_400), "year"),
    };
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Date portion of an RFC 3339 timestamp.
pub fn short_date(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.format("%Y-%m-%d").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

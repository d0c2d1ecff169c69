// ABOUTME: Display helpers for feed entries: m:ss durations and coarse relative ages.
// ABOUTME: Pure functions; callers supply "now" so output is deterministic.

use chrono::{DateTime, Utc};

/// Formats a duration in seconds as `m:ss`.
/// Minutes are not wrapped into hours, so 3723s renders as "62:03".
/// Negative and non-finite inputs render as "0:00".
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Renders the age of `created_at` relative to `now`.
/// Timestamps in the future are treated as "just now".
pub fn age_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created_at).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }

    const UNITS: &[(i64, &str)] = &[
        (365 * 24 * 3600, "year"),
        (30 * 24 * 3600, "month"),
        (7 * 24 * 3600, "week"),
        (24 * 3600, "day"),
        (3600, "hour"),
        (60, "minute"),
    ];

    for (unit_secs, name) in UNITS {
        let count = secs / unit_secs;
        if count >= 1 {
            let plural = if count == 1 { "" } else { "s" };
            return format!("{} {}{} ago", count, name, plural);
        }
    }

    "just now".to_string()
}

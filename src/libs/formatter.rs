//! Time duration formatting for reports and terminal display.
//!
//! Two formats are used throughout the application: the compact "HH:MM" form
//! for clock-in/clock-out tables, and a spelled-out "N hrs M min" form for
//! productive-hours figures where a decimal number of hours would read poorly.

use chrono::Duration;

/// Formats a duration as "HH:MM". Negative durations render as "00:00".
pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

/// Formats a decimal number of hours as "N hrs M min".
///
/// The value is rounded to whole minutes. Zero-valued parts are omitted,
/// a single hour uses the singular "hr", and a zero duration renders as
/// "0 min" rather than an empty string.
pub fn format_hours(decimal_hours: f64) -> String {
    let total_minutes = (decimal_hours * 60.0).round().max(0.0) as i64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{} {}", hours, if hours == 1 { "hr" } else { "hrs" }));
    }
    if minutes > 0 {
        parts.push(format!("{} min", minutes));
    }

    if parts.is_empty() {
        "0 min".to_string()
    } else {
        parts.join(" ")
    }
}

//! Productive-hours calculation.
//!
//! Elapsed time keeps accruing while the user is idle; idle minutes are
//! tracked separately and netted out here, at the point the headline figure
//! is computed. The function is total: idle time exceeding total time (which
//! can happen when overlapping idle signal sources mis-report) clamps to
//! zero instead of going negative.

/// Computes productive hours from total elapsed minutes and idle minutes.
///
/// `productive_hours(total, idle) = max(0, (total - idle) / 60)`
///
/// # Examples
///
/// ```
/// use punchclock::libs::productivity::productive_hours;
///
/// assert_eq!(productive_hours(120, 30), 1.5);
/// assert_eq!(productive_hours(100, 150), 0.0);
/// ```
pub fn productive_hours(total_minutes: u64, idle_minutes: u64) -> f64 {
    ((total_minutes as f64 - idle_minutes as f64) / 60.0).max(0.0)
}

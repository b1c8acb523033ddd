#[cfg(test)]
mod tests {
    use chrono::Duration;
    use punchclock::libs::formatter::{format_duration, format_hours};

    #[test]
    fn duration_formats_as_hh_mm() {
        assert_eq!(format_duration(&Duration::hours(8)), "08:00");
        assert_eq!(format_duration(&Duration::minutes(90)), "01:30");
        assert_eq!(format_duration(&Duration::minutes(45)), "00:45");
        assert_eq!(format_duration(&Duration::zero()), "00:00");
    }

    #[test]
    fn negative_duration_clamps() {
        assert_eq!(format_duration(&Duration::minutes(-30)), "00:00");
    }

    #[test]
    fn hours_spell_out_parts() {
        assert_eq!(format_hours(2.25), "2 hrs 15 min");
        assert_eq!(format_hours(1.0), "1 hr");
        assert_eq!(format_hours(0.5), "30 min");
        assert_eq!(format_hours(8.0), "8 hrs");
    }

    #[test]
    fn one_minute_of_productive_time() {
        // (2 total - 1 idle) minutes of work is a 1-minute figure
        assert_eq!(format_hours(1.0 / 60.0), "1 min");
    }

    #[test]
    fn zero_and_negative_render_as_zero_minutes() {
        assert_eq!(format_hours(0.0), "0 min");
        assert_eq!(format_hours(-1.5), "0 min");
    }

    #[test]
    fn sub_minute_values_round() {
        assert_eq!(format_hours(0.004), "0 min");
        assert_eq!(format_hours(0.0125), "1 min");
    }
}

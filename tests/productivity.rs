#[cfg(test)]
mod tests {
    use punchclock::libs::productivity::productive_hours;

    #[test]
    fn full_day_no_idle() {
        assert_eq!(productive_hours(480, 0), 8.0);
    }

    #[test]
    fn idle_time_is_netted_out() {
        assert_eq!(productive_hours(480, 60), 7.0);
        assert_eq!(productive_hours(90, 30), 1.0);
    }

    #[test]
    fn idle_exceeding_total_clamps_to_zero() {
        assert_eq!(productive_hours(100, 150), 0.0);
        assert_eq!(productive_hours(0, 1), 0.0);
    }

    #[test]
    fn zero_elapsed_is_zero() {
        assert_eq!(productive_hours(0, 0), 0.0);
    }

    #[test]
    fn monotonically_non_increasing_in_idle_minutes() {
        let total = 300;
        let mut previous = f64::INFINITY;
        for idle in 0..=400 {
            let hours = productive_hours(total, idle);
            assert!(hours <= previous, "idle={} increased productive hours", idle);
            assert!(hours >= 0.0);
            previous = hours;
        }
    }
}

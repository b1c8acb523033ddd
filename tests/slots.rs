#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};
    use punchclock::db::db::Db;
    use punchclock::db::slots::ResumeSlots;
    use punchclock::libs::session::{IdleEvent, Screenshot, Session, TimerState};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

    struct SlotsTestContext {
        _temp_dir: TempDir,
        _env: parking_lot::MutexGuard<'static, ()>,
    }

    impl TestContext for SlotsTestContext {
        fn setup() -> Self {
            let env = ENV_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            SlotsTestContext {
                _temp_dir: temp_dir,
                _env: env,
            }
        }
    }

    fn working_state() -> TimerState {
        let now = Local::now().naive_local();
        let mut state = TimerState::empty();
        state.is_working = true;
        state.current_session = Some(Session::begin(now));
        state.start_time = Some(now);
        state.elapsed_seconds = 1234;
        state.total_idle_minutes = 7;
        state.idle_events.push(IdleEvent {
            id: "1".to_string(),
            start_time: now,
            end_time: now + Duration::minutes(7),
            duration_minutes: 7,
        });
        state.screenshots.push(Screenshot {
            id: "2".to_string(),
            timestamp: now,
            image_url: "https://cdn.example.com/shots/2.jpg".to_string(),
        });
        state
    }

    #[test_context(SlotsTestContext)]
    #[test]
    fn round_trip_preserves_state(_ctx: &mut SlotsTestContext) {
        let slots = ResumeSlots::new().unwrap();
        let state = working_state();

        slots.save("alice", &state).unwrap();
        let loaded = slots.fetch("alice").unwrap().unwrap();

        assert!(loaded.is_working);
        assert_eq!(loaded.elapsed_seconds, 1234);
        assert_eq!(loaded.total_idle_minutes, 7);
        assert_eq!(loaded.idle_events, state.idle_events);
        assert_eq!(loaded.screenshots, state.screenshots);
        // The save stamps the snapshot
        assert!(loaded.last_saved.is_some());
    }

    #[test_context(SlotsTestContext)]
    #[test]
    fn slots_are_scoped_per_user(_ctx: &mut SlotsTestContext) {
        let slots = ResumeSlots::new().unwrap();
        let mut state = working_state();
        slots.save("alice", &state).unwrap();
        state.elapsed_seconds = 99;
        slots.save("bob", &state).unwrap();

        assert_eq!(slots.fetch("alice").unwrap().unwrap().elapsed_seconds, 1234);
        assert_eq!(slots.fetch("bob").unwrap().unwrap().elapsed_seconds, 99);

        slots.clear("alice").unwrap();
        assert!(slots.fetch("alice").unwrap().is_none());
        assert!(slots.fetch("bob").unwrap().is_some());
    }

    #[test_context(SlotsTestContext)]
    #[test]
    fn saving_twice_overwrites(_ctx: &mut SlotsTestContext) {
        let slots = ResumeSlots::new().unwrap();
        let mut state = working_state();

        slots.save("alice", &state).unwrap();
        state.elapsed_seconds = 2000;
        slots.save("alice", &state).unwrap();

        assert_eq!(slots.fetch("alice").unwrap().unwrap().elapsed_seconds, 2000);
    }

    #[test_context(SlotsTestContext)]
    #[test]
    fn clearing_an_absent_slot_is_a_no_op(_ctx: &mut SlotsTestContext) {
        let slots = ResumeSlots::new().unwrap();
        slots.clear("nobody").unwrap();
    }

    #[test_context(SlotsTestContext)]
    #[test]
    fn corrupt_slot_reads_as_absent(_ctx: &mut SlotsTestContext) {
        let slots = ResumeSlots::new().unwrap();
        slots.save("alice", &working_state()).unwrap();

        // Corrupt the stored JSON behind the accessor's back
        let db = Db::new().unwrap();
        db.conn
            .execute("UPDATE resume_slots SET state = '{not json' WHERE user_id = 'alice'", [])
            .unwrap();

        assert!(slots.fetch("alice").unwrap().is_none());
        // The corrupt row was dropped, not left to fail again
        assert!(slots.fetch("alice").unwrap().is_none());
    }
}

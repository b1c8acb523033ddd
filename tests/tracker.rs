#[cfg(test)]
mod tests {
    use chrono::{Duration, Local, NaiveDateTime};
    use punchclock::api::sessions::{session_key, SessionStore};
    use punchclock::api::uploads::ImageSink;
    use punchclock::api::ApiError;
    use punchclock::db::slots::ResumeSlots;
    use punchclock::libs::formatter::format_hours;
    use punchclock::libs::idle::IdleSignal;
    use punchclock::libs::screenshot::Capture;
    use punchclock::libs::session::{ApprovalStatus, Session, SessionStatus, TimerState};
    use punchclock::libs::tracker::{Tracker, TrackerState, TrackingControls};
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    // Tests rewrite HOME to point the data directory at a sandbox; the lock
    // keeps parallel test threads from seeing each other's sandbox.
    static ENV_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

    struct TrackerTestContext {
        _temp_dir: TempDir,
        _env: tokio::sync::MutexGuard<'static, ()>,
    }

    impl AsyncTestContext for TrackerTestContext {
        async fn setup() -> Self {
            let env = ENV_LOCK.lock().await;
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            TrackerTestContext {
                _temp_dir: temp_dir,
                _env: env,
            }
        }

        async fn teardown(self) {
            // Cleanup is automatic with TempDir
        }
    }

    /// In-memory session store keyed exactly like the remote one.
    #[derive(Clone, Default)]
    struct MemoryStore {
        docs: Arc<Mutex<HashMap<String, Session>>>,
        fail: Arc<AtomicBool>,
    }

    impl MemoryStore {
        fn doc_count(&self) -> usize {
            self.docs.lock().unwrap().len()
        }

        fn doc(&self, key: &str) -> Option<Session> {
            self.docs.lock().unwrap().get(key).cloned()
        }

        fn set_failing(&self, failing: bool) {
            self.fail.store(failing, Ordering::SeqCst);
        }
    }

    impl SessionStore for MemoryStore {
        async fn save(&self, user_id: &str, session: &Session) -> Result<String, ApiError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR));
            }
            let key = session_key(user_id, session.date);
            let mut doc = session.clone();
            doc.id = key.clone();
            doc.user_id = Some(user_id.to_string());
            self.docs.lock().unwrap().insert(key.clone(), doc);
            Ok(key)
        }

        async fn get_by_user_and_date(&self, user_id: &str, date: chrono::NaiveDate) -> Result<Option<Session>, ApiError> {
            Ok(self.doc(&session_key(user_id, date)))
        }

        async fn list_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<Session>, ApiError> {
            let mut sessions: Vec<Session> = self
                .docs
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.user_id.as_deref() == Some(user_id))
                .cloned()
                .collect();
            sessions.sort_by(|a, b| b.date.cmp(&a.date));
            sessions.truncate(limit);
            Ok(sessions)
        }

        async fn delete(&self, session_id: &str) -> Result<(), ApiError> {
            self.docs.lock().unwrap().remove(session_id);
            Ok(())
        }
    }

    /// In-memory image sink handing out sequential URLs.
    #[derive(Clone, Default)]
    struct MemorySink {
        uploads: Arc<Mutex<Vec<usize>>>,
        fail: Arc<AtomicBool>,
    }

    impl ImageSink for MemorySink {
        async fn upload(&self, image: &[u8]) -> Result<String, ApiError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ApiError::Status(StatusCode::BAD_GATEWAY));
            }
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(image.len());
            Ok(format!("https://cdn.example.com/shots/{}.jpg", uploads.len()))
        }
    }

    /// Records controller activations so tests can assert the tracker
    /// starts and stops tracking atomically with its transitions.
    #[derive(Clone, Default)]
    struct ControlLog {
        idle_running: Arc<AtomicBool>,
        capture_running: Arc<AtomicBool>,
    }

    struct RecordingControls(ControlLog);

    impl TrackingControls for RecordingControls {
        fn start_idle_tracking(&mut self) {
            self.0.idle_running.store(true, Ordering::SeqCst);
        }
        fn stop_idle_tracking(&mut self) {
            self.0.idle_running.store(false, Ordering::SeqCst);
        }
        fn start_screenshot_capture(&mut self) {
            self.0.capture_running.store(true, Ordering::SeqCst);
        }
        fn stop_screenshot_capture(&mut self) {
            self.0.capture_running.store(false, Ordering::SeqCst);
        }
    }

    fn build_tracker(user_id: &str, store: MemoryStore, sink: MemorySink, log: ControlLog) -> Tracker<MemoryStore, MemorySink> {
        let slots = ResumeSlots::new().unwrap();
        Tracker::new(user_id, slots, store, sink, Box::new(RecordingControls(log)))
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn end_to_end_idle_accounting(_ctx: &mut TrackerTestContext) {
        let mut tracker = build_tracker("user-e2e", MemoryStore::default(), MemorySink::default(), ControlLog::default());

        tracker.start_work().unwrap();
        let t0 = now();

        tracker.on_idle_signal(IdleSignal::Start(t0 + Duration::seconds(5))).unwrap();
        tracker.on_idle_signal(IdleSignal::End(t0 + Duration::seconds(65))).unwrap();
        for _ in 0..120 {
            tracker.on_tick().unwrap();
        }
        tracker.stop_work().unwrap();

        assert_eq!(tracker.state(), TrackerState::Stopped);
        let session = tracker.timer().current_session.as_ref().unwrap();
        assert_eq!(session.total_minutes, 2);
        assert_eq!(session.idle_minutes, 1);
        assert!((session.productive_hours - 1.0 / 60.0).abs() < 1e-9);
        assert_eq!(format_hours(session.productive_hours), "1 min");
        assert_eq!(session.idle_events.len(), 1);
        assert_eq!(session.idle_events[0].duration_minutes, 1);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn idle_end_without_start_is_a_no_op(_ctx: &mut TrackerTestContext) {
        let mut tracker = build_tracker("user-noend", MemoryStore::default(), MemorySink::default(), ControlLog::default());
        tracker.start_work().unwrap();

        tracker.on_idle_signal(IdleSignal::End(now())).unwrap();

        assert_eq!(tracker.timer().total_idle_minutes, 0);
        assert!(tracker.timer().idle_events.is_empty());
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn duplicate_idle_start_keeps_the_earliest(_ctx: &mut TrackerTestContext) {
        let mut tracker = build_tracker("user-dup", MemoryStore::default(), MemorySink::default(), ControlLog::default());
        tracker.start_work().unwrap();
        let t0 = now();

        tracker.on_idle_signal(IdleSignal::Start(t0)).unwrap();
        tracker.on_idle_signal(IdleSignal::Start(t0 + Duration::seconds(30))).unwrap();
        tracker.on_idle_signal(IdleSignal::End(t0 + Duration::seconds(120))).unwrap();

        assert_eq!(tracker.timer().idle_events.len(), 1);
        assert_eq!(tracker.timer().idle_events[0].start_time, t0);
        assert_eq!(tracker.timer().idle_events[0].duration_minutes, 2);
        assert_eq!(tracker.timer().total_idle_minutes, 2);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn sub_minute_idle_interval_is_not_recorded(_ctx: &mut TrackerTestContext) {
        let mut tracker = build_tracker("user-short", MemoryStore::default(), MemorySink::default(), ControlLog::default());
        tracker.start_work().unwrap();
        let t0 = now();

        tracker.on_idle_signal(IdleSignal::Start(t0)).unwrap();
        tracker.on_idle_signal(IdleSignal::End(t0 + Duration::seconds(45))).unwrap();

        assert!(tracker.timer().idle_events.is_empty());
        assert_eq!(tracker.timer().total_idle_minutes, 0);
        // The open interval was still cleared
        assert!(tracker.timer().open_idle_start.is_none());
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn double_clock_in_is_a_no_op(_ctx: &mut TrackerTestContext) {
        let mut tracker = build_tracker("user-double", MemoryStore::default(), MemorySink::default(), ControlLog::default());

        tracker.start_work().unwrap();
        let first_id = tracker.timer().current_session.as_ref().unwrap().id.clone();
        for _ in 0..3 {
            tracker.on_tick().unwrap();
        }

        tracker.start_work().unwrap();

        assert_eq!(tracker.timer().elapsed_seconds, 3);
        assert_eq!(tracker.timer().current_session.as_ref().unwrap().id, first_id);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn stop_without_active_session_is_a_no_op(_ctx: &mut TrackerTestContext) {
        let mut tracker = build_tracker("user-stopidle", MemoryStore::default(), MemorySink::default(), ControlLog::default());
        tracker.stop_work().unwrap();
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn cancel_clears_the_resume_slot(_ctx: &mut TrackerTestContext) {
        let store = MemoryStore::default();
        let mut tracker = build_tracker("user-cancel", store.clone(), MemorySink::default(), ControlLog::default());

        tracker.start_work().unwrap();
        let t0 = now();
        tracker.on_idle_signal(IdleSignal::Start(t0)).unwrap();
        tracker.on_idle_signal(IdleSignal::End(t0 + Duration::seconds(90))).unwrap();

        tracker.cancel_work().unwrap();

        assert_eq!(tracker.state(), TrackerState::Idle);
        assert_eq!(store.doc_count(), 0);

        let slots = ResumeSlots::new().unwrap();
        assert!(slots.fetch("user-cancel").unwrap().is_none());

        // A fresh process finds nothing to resume
        let mut resumed = build_tracker("user-cancel", store, MemorySink::default(), ControlLog::default());
        assert!(!resumed.resume_if_persisted().unwrap());
        assert_eq!(resumed.state(), TrackerState::Idle);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn cancel_while_idle_is_a_no_op(_ctx: &mut TrackerTestContext) {
        let mut tracker = build_tracker("user-cancelidle", MemoryStore::default(), MemorySink::default(), ControlLog::default());
        tracker.cancel_work().unwrap();
        tracker.cancel_work().unwrap();
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn submit_freezes_session_and_clears_state(_ctx: &mut TrackerTestContext) {
        let store = MemoryStore::default();
        let log = ControlLog::default();
        let mut tracker = build_tracker("user-submit", store.clone(), MemorySink::default(), log.clone());

        tracker.start_work().unwrap();
        assert!(log.idle_running.load(Ordering::SeqCst));
        assert!(log.capture_running.load(Ordering::SeqCst));

        for _ in 0..180 {
            tracker.on_tick().unwrap();
        }
        tracker.stop_work().unwrap();
        // Stopping must not yet deactivate tracking controllers
        assert!(log.idle_running.load(Ordering::SeqCst));

        let date = tracker.timer().current_session.as_ref().unwrap().date;
        tracker.submit_session(Some("left early".to_string())).await.unwrap();

        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(!log.idle_running.load(Ordering::SeqCst));
        assert!(!log.capture_running.load(Ordering::SeqCst));

        let key = session_key("user-submit", date);
        let doc = store.doc(&key).unwrap();
        assert_eq!(doc.status, SessionStatus::Submitted);
        assert_eq!(doc.approval_status, Some(ApprovalStatus::Pending));
        assert_eq!(doc.less_hours_comment.as_deref(), Some("left early"));
        assert_eq!(doc.total_minutes, 3);

        // Submitted session is prepended to the in-memory history
        assert_eq!(tracker.history().len(), 1);
        assert_eq!(tracker.history()[0].id, key);

        let slots = ResumeSlots::new().unwrap();
        assert!(slots.fetch("user-submit").unwrap().is_none());
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn submitting_twice_for_one_day_overwrites_one_document(_ctx: &mut TrackerTestContext) {
        let store = MemoryStore::default();

        let mut tracker = build_tracker("user-twice", store.clone(), MemorySink::default(), ControlLog::default());
        tracker.start_work().unwrap();
        for _ in 0..60 {
            tracker.on_tick().unwrap();
        }
        tracker.stop_work().unwrap();
        tracker.submit_session(None).await.unwrap();
        assert_eq!(store.doc_count(), 1);

        // Same user, same day, a second session
        let mut tracker = build_tracker("user-twice", store.clone(), MemorySink::default(), ControlLog::default());
        tracker.start_work().unwrap();
        for _ in 0..600 {
            tracker.on_tick().unwrap();
        }
        tracker.stop_work().unwrap();
        tracker.submit_session(None).await.unwrap();

        assert_eq!(store.doc_count(), 1);
        let key = session_key("user-twice", Local::now().date_naive());
        assert_eq!(store.doc(&key).unwrap().total_minutes, 10);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn failed_submit_leaves_everything_for_retry(_ctx: &mut TrackerTestContext) {
        let store = MemoryStore::default();
        let mut tracker = build_tracker("user-retry", store.clone(), MemorySink::default(), ControlLog::default());

        tracker.start_work().unwrap();
        for _ in 0..120 {
            tracker.on_tick().unwrap();
        }
        tracker.stop_work().unwrap();

        store.set_failing(true);
        assert!(tracker.submit_session(Some("note".to_string())).await.is_err());

        // Nothing was mutated: still stopped, slot intact, history empty
        assert_eq!(tracker.state(), TrackerState::Stopped);
        assert!(tracker.timer().current_session.is_some());
        assert!(tracker.history().is_empty());
        let slots = ResumeSlots::new().unwrap();
        assert!(slots.fetch("user-retry").unwrap().is_some());

        // Retry succeeds without re-tracking anything
        store.set_failing(false);
        tracker.submit_session(Some("note".to_string())).await.unwrap();
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert_eq!(store.doc_count(), 1);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn screenshot_upload_success_prepends(_ctx: &mut TrackerTestContext) {
        let sink = MemorySink::default();
        let mut tracker = build_tracker("user-shots", MemoryStore::default(), sink.clone(), ControlLog::default());
        tracker.start_work().unwrap();

        tracker
            .on_screenshot(Capture {
                timestamp: now(),
                image: vec![1, 2, 3],
            })
            .await
            .unwrap();
        tracker
            .on_screenshot(Capture {
                timestamp: now(),
                image: vec![4, 5, 6, 7],
            })
            .await
            .unwrap();

        let shots = &tracker.timer().screenshots;
        assert_eq!(shots.len(), 2);
        // Newest first
        assert_eq!(shots[0].image_url, "https://cdn.example.com/shots/2.jpg");
        assert_eq!(shots[1].image_url, "https://cdn.example.com/shots/1.jpg");
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn failed_upload_drops_the_screenshot(_ctx: &mut TrackerTestContext) {
        let sink = MemorySink::default();
        sink.fail.store(true, Ordering::SeqCst);
        let mut tracker = build_tracker("user-dropshot", MemoryStore::default(), sink, ControlLog::default());
        tracker.start_work().unwrap();

        tracker
            .on_screenshot(Capture {
                timestamp: now(),
                image: vec![1, 2, 3],
            })
            .await
            .unwrap();

        assert!(tracker.timer().screenshots.is_empty());
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn resume_restores_state_verbatim(_ctx: &mut TrackerTestContext) {
        let store = MemoryStore::default();
        let mut tracker = build_tracker("user-resume", store.clone(), MemorySink::default(), ControlLog::default());

        tracker.start_work().unwrap();
        let t0 = now();
        tracker.on_idle_signal(IdleSignal::Start(t0)).unwrap();
        tracker.on_idle_signal(IdleSignal::End(t0 + Duration::seconds(150))).unwrap();
        for _ in 0..300 {
            tracker.on_tick().unwrap();
        }
        let saved_events = tracker.timer().idle_events.clone();
        drop(tracker);

        // A new process: restores exactly, no extrapolated elapsed time
        let log = ControlLog::default();
        let mut tracker = build_tracker("user-resume", store, MemorySink::default(), log.clone());
        assert!(tracker.resume_if_persisted().unwrap());

        assert_eq!(tracker.state(), TrackerState::Working);
        assert_eq!(tracker.timer().elapsed_seconds, 300);
        assert_eq!(tracker.timer().total_idle_minutes, 2);
        assert_eq!(tracker.timer().idle_events, saved_events);
        assert!(log.idle_running.load(Ordering::SeqCst));
        assert!(log.capture_running.load(Ordering::SeqCst));
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn stale_slot_from_yesterday_is_discarded(_ctx: &mut TrackerTestContext) {
        let yesterday = Local::now().naive_local() - Duration::days(1);
        let mut state = TimerState::empty();
        state.is_working = true;
        state.elapsed_seconds = 4000;
        state.current_session = Some(Session::begin(yesterday));

        let slots = ResumeSlots::new().unwrap();
        slots.save("user-stale", &state).unwrap();

        let mut tracker = build_tracker("user-stale", MemoryStore::default(), MemorySink::default(), ControlLog::default());
        assert!(!tracker.resume_if_persisted().unwrap());
        assert_eq!(tracker.state(), TrackerState::Idle);

        let slots = ResumeSlots::new().unwrap();
        assert!(slots.fetch("user-stale").unwrap().is_none());
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn restore_picks_up_a_stopped_session(_ctx: &mut TrackerTestContext) {
        let store = MemoryStore::default();
        let mut tracker = build_tracker("user-restore", store.clone(), MemorySink::default(), ControlLog::default());
        tracker.start_work().unwrap();
        for _ in 0..90 {
            tracker.on_tick().unwrap();
        }
        tracker.stop_work().unwrap();
        drop(tracker);

        let mut tracker = build_tracker("user-restore", store, MemorySink::default(), ControlLog::default());
        assert!(tracker.restore().unwrap());
        assert_eq!(tracker.state(), TrackerState::Stopped);
        assert_eq!(tracker.timer().current_session.as_ref().unwrap().total_minutes, 1);

        tracker.submit_session(None).await.unwrap();
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn close_keeps_the_slot_but_stops_tracking(_ctx: &mut TrackerTestContext) {
        let log = ControlLog::default();
        let mut tracker = build_tracker("user-close", MemoryStore::default(), MemorySink::default(), log.clone());
        tracker.start_work().unwrap();
        for _ in 0..10 {
            tracker.on_tick().unwrap();
        }

        tracker.on_close();

        assert!(!log.idle_running.load(Ordering::SeqCst));
        assert!(!log.capture_running.load(Ordering::SeqCst));
        let slots = ResumeSlots::new().unwrap();
        let saved = slots.fetch("user-close").unwrap().unwrap();
        assert!(saved.is_working);
        assert_eq!(saved.elapsed_seconds, 10);
    }
}

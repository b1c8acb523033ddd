//! Idle tracking controller.
//!
//! Owns the subscriptions that feed the `IdleDetector`: a global input
//! listener (keyboard, mouse, wheel) that refreshes a shared last-activity
//! instant, and a polling task that samples seconds-since-last-input on a
//! fixed interval. Emitted transitions flow over a channel to a single
//! subscriber, the session lifecycle manager.
//!
//! Start and stop are idempotent: starting while already tracking is a
//! no-op, stopping while not tracking is a no-op, and repeated start/stop
//! cycles never leak polling tasks.
//!
//! A plain process has no OS power-event feed, so the poll loop also infers
//! suspends from wall-clock jumps: a gap of at least the idle threshold
//! between consecutive samples is replayed through the detector as a
//! suspend/resume pair. Hosts that do have a feed push `PowerEvent`s in
//! through `handle_power_event`; both paths coalesce in the detector.

use crate::libs::config::MonitorConfig;
use crate::libs::idle::{IdleDetector, IdleSignal, PowerEvent};
use crate::msg_debug;
use chrono::Local;
use parking_lot::Mutex;
use rdev::{listen, Event, EventType};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};

pub struct Monitor {
    config: MonitorConfig,
    last_activity: Arc<Mutex<Instant>>,
    detector: Arc<Mutex<IdleDetector>>,
    tx: mpsc::UnboundedSender<IdleSignal>,
    poll_task: Option<JoinHandle<()>>,
    listener_spawned: bool,
}

impl Monitor {
    pub fn new(config: MonitorConfig, tx: mpsc::UnboundedSender<IdleSignal>) -> Self {
        let detector = Arc::new(Mutex::new(IdleDetector::new(config.idle_threshold)));
        Monitor {
            config,
            last_activity: Arc::new(Mutex::new(Instant::now())),
            detector,
            tx,
            poll_task: None,
            listener_spawned: false,
        }
    }

    /// Starts the input listener and the polling task. No-op if already
    /// tracking.
    pub fn start(&mut self) {
        if self.poll_task.is_some() {
            return;
        }

        self.spawn_input_listener();
        *self.last_activity.lock() = Instant::now();
        self.detector.lock().reset();

        let last_activity = self.last_activity.clone();
        let detector = self.detector.clone();
        let tx = self.tx.clone();
        let poll_interval = self.config.poll_interval;
        let idle_threshold = self.config.idle_threshold;

        self.poll_task = Some(tokio::spawn(async move {
            let mut prev_sample = Local::now().naive_local();
            loop {
                time::sleep(Duration::from_millis(poll_interval)).await;
                let now = Local::now().naive_local();

                // A wall-clock jump across samples means the machine slept;
                // replay it as suspend-at-gap-start, resume-now.
                let gap = (now - prev_sample).num_seconds();
                if gap >= idle_threshold as i64 {
                    let mut det = detector.lock();
                    if let Some(signal) = det.on_power_event(PowerEvent::Suspend, prev_sample) {
                        let _ = tx.send(signal);
                    }
                    if let Some(signal) = det.on_power_event(PowerEvent::Resume, now) {
                        let _ = tx.send(signal);
                    }
                    *last_activity.lock() = Instant::now();
                }
                prev_sample = now;

                let idle_secs = last_activity.lock().elapsed().as_secs();
                if let Some(signal) = detector.lock().sample(idle_secs, now) {
                    let _ = tx.send(signal);
                }
            }
        }));
    }

    /// Cancels the polling task and clears idle state. No-op if not
    /// tracking.
    pub fn stop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
        self.detector.lock().reset();
    }

    pub fn is_tracking(&self) -> bool {
        self.poll_task.is_some()
    }

    /// Forwards an OS power/screen event into the detector. Ignored while
    /// not tracking.
    pub fn handle_power_event(&self, event: PowerEvent) {
        if self.poll_task.is_none() {
            return;
        }
        let at = Local::now().naive_local();
        if let Some(signal) = self.detector.lock().on_power_event(event, at) {
            let _ = self.tx.send(signal);
        }
    }

    // The rdev listener blocks its thread for the life of the process and
    // cannot be cancelled; it only refreshes the last-activity instant, so
    // it is spawned once and left running across start/stop cycles.
    fn spawn_input_listener(&mut self) {
        if self.listener_spawned {
            return;
        }
        self.listener_spawned = true;

        let shared_last_activity = self.last_activity.clone();
        std::thread::spawn(move || loop {
            let last_activity = shared_last_activity.clone();
            if let Err(e) = listen(move |event: Event| match event.event_type {
                EventType::KeyPress(_) | EventType::ButtonPress(_) | EventType::Wheel { .. } | EventType::MouseMove { .. } => {
                    *last_activity.lock() = Instant::now();
                }
                _ => {}
            }) {
                msg_debug!(format!("input listener failed: {:?}, retrying in 1 second", e));
                std::thread::sleep(std::time::Duration::from_secs(1));
            } else {
                break;
            }
        });
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}

//! Session lifecycle manager: the state machine governing one work session
//! per calendar day per user.
//!
//! States move `Idle → Working → Stopped → Idle`. `Working` is the only
//! state in which the elapsed-time tick, idle tracking, and screenshot
//! capture are all live. Clock-out computes the day's totals but leaves the
//! session provisionally open until the user submits (freeze and persist
//! remotely) or cancels (discard); only those two paths clear the durable
//! resume-slot.
//!
//! The resume-slot makes the session survive process restarts: every
//! mutation while working overwrites the slot with a full `TimerState`
//! snapshot, and startup restores it verbatim when it belongs to today.
//! Elapsed seconds are deliberately not extrapolated across the downtime.
//! Crediting unobserved wall-clock time risks counting hours the user never
//! worked, so a resumed timer undercounts by the gap instead.
//!
//! Precondition violations (double clock-in, stop with nothing active,
//! idle-end with no open interval) are defensive no-ops, never errors; only
//! the submit path surfaces a failure to the caller so tracked data is not
//! lost on a flaky network.

use crate::api::sessions::SessionStore;
use crate::api::uploads::ImageSink;
use crate::db::slots::ResumeSlots;
use crate::libs::idle::IdleSignal;
use crate::libs::messages::Message;
use crate::libs::productivity::productive_hours;
use crate::libs::screenshot::Capture;
use crate::libs::session::{ApprovalStatus, IdleEvent, Screenshot, Session, SessionStatus, TimerState};
use crate::{msg_debug, msg_error, msg_info, msg_warning};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Working,
    Stopped,
}

/// Control surface over the idle tracking and screenshot capture
/// controllers. The tracker drives these atomically with its state
/// transitions; hosts without live controllers (short-lived CLI processes
/// finalizing a session) plug in `NullControls`.
pub trait TrackingControls {
    fn start_idle_tracking(&mut self);
    fn stop_idle_tracking(&mut self);
    fn start_screenshot_capture(&mut self);
    fn stop_screenshot_capture(&mut self);
}

/// No-op controls for processes that operate on persisted state only.
pub struct NullControls;

impl TrackingControls for NullControls {
    fn start_idle_tracking(&mut self) {}
    fn stop_idle_tracking(&mut self) {}
    fn start_screenshot_capture(&mut self) {}
    fn stop_screenshot_capture(&mut self) {}
}

pub struct Tracker<S: SessionStore, U: ImageSink> {
    user_id: String,
    state: TrackerState,
    timer: TimerState,
    history: Vec<Session>,
    slots: ResumeSlots,
    store: S,
    sink: U,
    controls: Box<dyn TrackingControls + Send>,
}

impl<S: SessionStore, U: ImageSink> Tracker<S, U> {
    pub fn new(user_id: &str, slots: ResumeSlots, store: S, sink: U, controls: Box<dyn TrackingControls + Send>) -> Self {
        Tracker {
            user_id: user_id.to_string(),
            state: TrackerState::Idle,
            timer: TimerState::empty(),
            history: Vec::new(),
            slots,
            store,
            sink,
            controls,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn history(&self) -> &[Session] {
        &self.history
    }

    /// Clocks in: creates a fresh session and activates tracking.
    ///
    /// A second clock-in while already working is a no-op.
    pub fn start_work(&mut self) -> Result<()> {
        if self.state == TrackerState::Working {
            msg_warning!(Message::AlreadyWorking);
            return Ok(());
        }

        let now = Local::now().naive_local();
        self.timer = TimerState {
            is_working: true,
            current_session: Some(Session::begin(now)),
            start_time: Some(now),
            elapsed_seconds: 0,
            idle_events: Vec::new(),
            screenshots: Vec::new(),
            total_idle_minutes: 0,
            open_idle_start: None,
            last_saved: None,
        };
        self.state = TrackerState::Working;
        self.persist()?;

        self.controls.start_idle_tracking();
        self.controls.start_screenshot_capture();
        Ok(())
    }

    /// One second of elapsed time. Only meaningful while working.
    pub fn on_tick(&mut self) -> Result<()> {
        if self.state != TrackerState::Working {
            return Ok(());
        }
        self.timer.elapsed_seconds += 1;
        self.persist()
    }

    /// Handles a normalized idle transition from the signal source.
    pub fn on_idle_signal(&mut self, signal: IdleSignal) -> Result<()> {
        if self.state != TrackerState::Working {
            return Ok(());
        }

        match signal {
            IdleSignal::Start(at) => {
                // A duplicate start while an interval is open keeps the
                // earliest start; the open interval is never shortened.
                if self.timer.open_idle_start.is_none() {
                    self.timer.open_idle_start = Some(at);
                    msg_debug!(Message::IdleStarted(at.to_string()));
                    self.persist()?;
                }
            }
            IdleSignal::End(at) => {
                // An end with no open start is ignored.
                if let Some(started) = self.timer.open_idle_start.take() {
                    let minutes = (at - started).num_minutes();
                    if minutes > 0 {
                        self.timer.idle_events.push(IdleEvent {
                            id: event_id(at),
                            start_time: started,
                            end_time: at,
                            duration_minutes: minutes,
                        });
                        self.timer.total_idle_minutes += minutes as u64;
                        msg_debug!(Message::IdleEnded(at.to_string(), minutes));
                    }
                    self.persist()?;
                }
            }
        }
        Ok(())
    }

    /// Handles a capture event: uploads the image and records the URL.
    ///
    /// A failed upload drops the screenshot and logs; capture cadence and
    /// the session itself are unaffected.
    pub async fn on_screenshot(&mut self, capture: Capture) -> Result<()> {
        if self.state != TrackerState::Working {
            return Ok(());
        }

        match self.sink.upload(&capture.image).await {
            Ok(url) => {
                self.timer.screenshots.insert(
                    0,
                    Screenshot {
                        id: event_id(capture.timestamp),
                        timestamp: capture.timestamp,
                        image_url: url,
                    },
                );
                self.persist()?;
            }
            Err(e) => msg_error!(Message::ScreenshotUploadFailed(e.to_string())),
        }
        Ok(())
    }

    /// Clocks out: fills in the session totals and moves to `Stopped`.
    ///
    /// Tracking controllers and the resume-slot are deliberately left alone
    /// here; the session stays provisionally open until the user submits
    /// or cancels.
    pub fn stop_work(&mut self) -> Result<()> {
        if self.state != TrackerState::Working || self.timer.current_session.is_none() {
            msg_warning!(Message::NoActiveSession);
            return Ok(());
        }

        let now = Local::now().naive_local();
        let total_minutes = self.timer.elapsed_seconds / 60;
        let idle_minutes = self.timer.total_idle_minutes.min(total_minutes);

        if let Some(session) = self.timer.current_session.as_mut() {
            session.clock_out = Some(now);
            session.total_minutes = total_minutes;
            session.idle_minutes = idle_minutes;
            session.productive_hours = productive_hours(total_minutes, idle_minutes);
            session.screenshots = self.timer.screenshots.clone();
            session.idle_events = self.timer.idle_events.clone();
        }

        self.timer.is_working = false;
        self.state = TrackerState::Stopped;
        self.persist()
    }

    /// Discards the session: stops tracking, clears all in-memory state and
    /// the resume-slot. Valid from `Working` (abort) and `Stopped`; a no-op
    /// when idle. Nothing is written remotely.
    pub fn cancel_work(&mut self) -> Result<()> {
        if self.state == TrackerState::Idle {
            return Ok(());
        }

        self.controls.stop_idle_tracking();
        self.controls.stop_screenshot_capture();
        self.slots.clear(&self.user_id)?;
        self.timer = TimerState::empty();
        self.state = TrackerState::Idle;
        Ok(())
    }

    /// Submits the stopped session to the remote store.
    ///
    /// On store failure the error propagates and no local state is mutated,
    /// so the user can retry without losing tracked data.
    pub async fn submit_session(&mut self, comment: Option<String>) -> Result<()> {
        if self.state != TrackerState::Stopped {
            msg_warning!(Message::NothingToSubmit);
            return Ok(());
        }
        let Some(session) = self.timer.current_session.as_ref() else {
            msg_warning!(Message::NothingToSubmit);
            return Ok(());
        };

        let mut submitted = session.clone();
        submitted.status = SessionStatus::Submitted;
        submitted.approval_status = Some(ApprovalStatus::Pending);
        submitted.less_hours_comment = comment;

        let key = self.store.save(&self.user_id, &submitted).await?;
        submitted.id = key;
        submitted.user_id = Some(self.user_id.clone());

        self.controls.stop_idle_tracking();
        self.controls.stop_screenshot_capture();
        self.slots.clear(&self.user_id)?;
        self.history.insert(0, submitted);
        self.timer = TimerState::empty();
        self.state = TrackerState::Idle;
        Ok(())
    }

    /// Restores a mid-session state saved by a previous process, if it
    /// belongs to today, and re-activates tracking.
    ///
    /// Elapsed seconds come back exactly as last saved. A slot from another
    /// day is discarded; a same-day slot that is not working (a stopped
    /// session awaiting submission) is left in place for `restore` and does
    /// not resume tracking. Returns whether tracking resumed.
    pub fn resume_if_persisted(&mut self) -> Result<bool> {
        if self.state != TrackerState::Idle {
            return Ok(false);
        }

        let Some(saved) = self.slots.fetch(&self.user_id)? else {
            return Ok(false);
        };

        let Some(session_date) = saved.current_session.as_ref().map(|s| s.date) else {
            self.slots.clear(&self.user_id)?;
            return Ok(false);
        };

        let today = Local::now().date_naive();
        if session_date != today {
            msg_info!(Message::StaleSlotDiscarded(session_date.to_string()));
            self.slots.clear(&self.user_id)?;
            return Ok(false);
        }

        if !saved.is_working {
            return Ok(false);
        }

        let elapsed = saved.elapsed_seconds;
        self.timer = saved;
        self.state = TrackerState::Working;
        self.controls.start_idle_tracking();
        self.controls.start_screenshot_capture();
        msg_info!(Message::SessionResumed(session_date.to_string(), elapsed));
        Ok(true)
    }

    /// Restores any same-day slot into its matching state without touching
    /// the tracking controllers.
    ///
    /// This is the entry point for short-lived processes that finalize a
    /// session the tracker daemon left behind: a working snapshot restores
    /// as `Working` (ready for `stop_work`), a clocked-out one as `Stopped`
    /// (ready for `submit_session`/`cancel_work`). Stale slots are
    /// discarded. Returns whether anything was restored.
    pub fn restore(&mut self) -> Result<bool> {
        if self.state != TrackerState::Idle {
            return Ok(false);
        }

        let Some(saved) = self.slots.fetch(&self.user_id)? else {
            return Ok(false);
        };

        let Some(session) = saved.current_session.as_ref() else {
            self.slots.clear(&self.user_id)?;
            return Ok(false);
        };

        let today = Local::now().date_naive();
        if session.date != today {
            msg_info!(Message::StaleSlotDiscarded(session.date.to_string()));
            self.slots.clear(&self.user_id)?;
            return Ok(false);
        }

        self.state = if saved.is_working {
            TrackerState::Working
        } else {
            TrackerState::Stopped
        };
        self.timer = saved;
        Ok(true)
    }

    /// Host teardown hook: cancels tracking timers without deciding the
    /// session's fate. The slot stays, so a later process can resume. Safe
    /// to call in any state.
    pub fn on_close(&mut self) {
        self.controls.stop_idle_tracking();
        self.controls.stop_screenshot_capture();
    }

    fn persist(&mut self) -> Result<()> {
        self.slots.save(&self.user_id, &self.timer)
    }
}

fn event_id(at: NaiveDateTime) -> String {
    at.and_utc().timestamp_millis().to_string()
}

//! Idle signal source: normalizes heterogeneous activity signals into a
//! single stream of idle-start / idle-end transitions.
//!
//! Three kinds of input feed the detector: power events (suspend/resume),
//! screen lock/unlock, and a polled seconds-since-last-input sample. They
//! coalesce into one logical idle state. A transition is only emitted when
//! the state actually flips, so lock followed immediately by suspend (or any
//! other near-simultaneous pair) produces a single `Start`.
//!
//! Policy:
//! - suspend and lock declare idleness immediately;
//! - resume ends idleness only when the suspended span reached the idle
//!   threshold; shorter suspends are noise and leave the state unchanged;
//! - unlock ends idleness unconditionally;
//! - the poll path fires only on threshold crossings, in either direction.

use chrono::NaiveDateTime;

/// A normalized idle transition, carrying the moment it took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleSignal {
    Start(NaiveDateTime),
    End(NaiveDateTime),
}

/// Raw power/screen events a host can push into the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEvent {
    Suspend,
    Resume,
    LockScreen,
    UnlockScreen,
}

/// Coalescing state machine over all idle signal sources.
#[derive(Debug)]
pub struct IdleDetector {
    threshold_secs: u64,
    was_idle: bool,
    suspend_started: Option<NaiveDateTime>,
}

impl IdleDetector {
    pub fn new(threshold_secs: u64) -> Self {
        IdleDetector {
            threshold_secs,
            was_idle: false,
            suspend_started: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.was_idle
    }

    /// Feeds a power/screen event, returning the transition to emit, if any.
    pub fn on_power_event(&mut self, event: PowerEvent, at: NaiveDateTime) -> Option<IdleSignal> {
        match event {
            PowerEvent::Suspend => {
                self.suspend_started = Some(at);
                if !self.was_idle {
                    self.was_idle = true;
                    return Some(IdleSignal::Start(at));
                }
                None
            }
            PowerEvent::Resume => {
                if let Some(started) = self.suspend_started.take() {
                    let slept = (at - started).num_seconds();
                    if slept >= self.threshold_secs as i64 && self.was_idle {
                        self.was_idle = false;
                        return Some(IdleSignal::End(at));
                    }
                }
                None
            }
            PowerEvent::LockScreen => {
                if !self.was_idle {
                    self.was_idle = true;
                    return Some(IdleSignal::Start(at));
                }
                None
            }
            PowerEvent::UnlockScreen => {
                if self.was_idle {
                    self.was_idle = false;
                    return Some(IdleSignal::End(at));
                }
                None
            }
        }
    }

    /// Feeds a polled seconds-since-last-input sample.
    ///
    /// Emits `Start` on the transition from below-threshold to at/above, and
    /// `End` on the reverse; never double-fires while already in the
    /// corresponding state.
    pub fn sample(&mut self, idle_secs: u64, at: NaiveDateTime) -> Option<IdleSignal> {
        if idle_secs >= self.threshold_secs && !self.was_idle {
            self.was_idle = true;
            Some(IdleSignal::Start(at))
        } else if idle_secs < self.threshold_secs && self.was_idle {
            self.was_idle = false;
            Some(IdleSignal::End(at))
        } else {
            None
        }
    }

    /// Clears all state; used when tracking stops.
    pub fn reset(&mut self) {
        self.was_idle = false;
        self.suspend_started = None;
    }
}

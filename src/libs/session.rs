//! Session data model: the per-day work record and its working state.
//!
//! `Session` is the durable aggregate submitted to the remote store;
//! `TimerState` is the process-local working copy mutated on every tick and
//! event while a session is being tracked, and snapshotted to the resume-slot
//! so an interrupted process can pick the session back up.
//!
//! All wire-facing structs serialize with camelCase field names to match the
//! remote store's document schema.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A closed idle interval recorded against the active session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdleEvent {
    pub id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: i64,
}

/// A captured-and-uploaded screenshot; only the URL is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Screenshot {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Submitted,
}

/// Set by a reviewer after submission; read-only on this side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

/// One calendar day's work record for one user.
///
/// Totals and the productive-hours figure are zero until clock-out fills
/// them in; the session becomes immutable once `status` is `Submitted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub date: NaiveDate,
    pub clock_in: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_out: Option<NaiveDateTime>,
    pub total_minutes: u64,
    pub idle_minutes: u64,
    pub productive_hours: f64,
    pub screenshots: Vec<Screenshot>,
    pub idle_events: Vec<IdleEvent>,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub less_hours_comment: Option<String>,
}

impl Session {
    /// Creates a fresh active session clocked in at `now`.
    ///
    /// The local id is time-based; the externally persisted identity is the
    /// `userId_date` key assigned by the store at save time.
    pub fn begin(now: NaiveDateTime) -> Self {
        Session {
            id: now.and_utc().timestamp_millis().to_string(),
            user_id: None,
            date: now.date(),
            clock_in: now,
            clock_out: None,
            total_minutes: 0,
            idle_minutes: 0,
            productive_hours: 0.0,
            screenshots: Vec::new(),
            idle_events: Vec::new(),
            status: SessionStatus::Active,
            approval_status: None,
            less_hours_comment: None,
        }
    }
}

/// Process-local working state, snapshotted to the resume-slot on every
/// mutation while a session is being tracked.
///
/// `elapsed_seconds` is whatever was last saved; a restart restores it
/// verbatim with no extrapolation of the downtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub is_working: bool,
    pub current_session: Option<Session>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveDateTime>,
    pub elapsed_seconds: u64,
    pub idle_events: Vec<IdleEvent>,
    pub screenshots: Vec<Screenshot>,
    pub total_idle_minutes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_idle_start: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<NaiveDateTime>,
}

impl TimerState {
    pub fn empty() -> Self {
        TimerState {
            is_working: false,
            current_session: None,
            start_time: None,
            elapsed_seconds: 0,
            idle_events: Vec::new(),
            screenshots: Vec::new(),
            total_idle_minutes: 0,
            open_idle_start: None,
            last_saved: None,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::empty()
    }
}

//! Durable resume-slot storage.
//!
//! While a session is being tracked, the full `TimerState` snapshot is
//! written here on every mutation, keyed by user id, so a process restart
//! can pick the session back up. The slot is single-writer (only the session
//! lifecycle manager touches it) and last-write-wins.
//!
//! A slot that fails to parse is treated as absent: the corrupt row is
//! logged, removed, and startup proceeds with a clean state.

use crate::db::db::Db;
use crate::libs::messages::Message;
use crate::libs::session::TimerState;
use crate::msg_warning;
use anyhow::Result;
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};

const SCHEMA_SLOTS: &str = "CREATE TABLE IF NOT EXISTS resume_slots (
    user_id TEXT NOT NULL PRIMARY KEY,
    state TEXT NOT NULL,
    last_saved TIMESTAMP NOT NULL
)";

const UPSERT_SLOT: &str = "INSERT INTO resume_slots (user_id, state, last_saved) VALUES (?1, ?2, ?3)
    ON CONFLICT(user_id) DO UPDATE SET state = ?2, last_saved = ?3";
const SELECT_SLOT: &str = "SELECT state FROM resume_slots WHERE user_id = ?1";
const DELETE_SLOT: &str = "DELETE FROM resume_slots WHERE user_id = ?1";

/// Resume-slot accessor over the local SQLite database.
pub struct ResumeSlots {
    conn: Connection,
}

impl ResumeSlots {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        db.conn.execute(SCHEMA_SLOTS, [])?;
        Ok(ResumeSlots { conn: db.conn })
    }

    /// Overwrites the slot for `user_id` with a snapshot of `state`.
    ///
    /// The stored snapshot carries a `lastSaved` timestamp so the age of the
    /// data is visible on restore.
    pub fn save(&self, user_id: &str, state: &TimerState) -> Result<()> {
        let now = Local::now().naive_local();
        let mut snapshot = state.clone();
        snapshot.last_saved = Some(now);

        let json = serde_json::to_string(&snapshot)?;
        let now_str = now.format("%Y-%m-%d %H:%M:%S").to_string();
        self.conn.execute(UPSERT_SLOT, params![user_id, json, now_str])?;
        Ok(())
    }

    /// Reads the slot for `user_id`, or `None` if absent or unreadable.
    pub fn fetch(&self, user_id: &str) -> Result<Option<TimerState>> {
        let json: Option<String> = self
            .conn
            .query_row(SELECT_SLOT, params![user_id], |row| row.get(0))
            .optional()?;

        let Some(json) = json else {
            return Ok(None);
        };

        match serde_json::from_str::<TimerState>(&json) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                msg_warning!(Message::SlotCorrupt(e.to_string()));
                self.clear(user_id)?;
                Ok(None)
            }
        }
    }

    /// Removes the slot for `user_id`. Removing an absent slot is a no-op.
    pub fn clear(&self, user_id: &str) -> Result<()> {
        self.conn.execute(DELETE_SLOT, params![user_id])?;
        Ok(())
    }
}

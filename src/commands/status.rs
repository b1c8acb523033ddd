//! Shows the current tracking state from the resume-slot and the daemon
//! PID file. Read-only; nothing is mutated and no network call is made.

use crate::api::auth;
use crate::db::slots::ResumeSlots;
use crate::libs::daemon;
use crate::libs::formatter::format_duration;
use crate::libs::messages::Message;
use crate::msg_error;
use crate::msg_print;
use anyhow::Result;
use chrono::Duration;
use prettytable::{row, Table};

pub fn cmd() -> Result<()> {
    let Some(user) = auth::current_user()? else {
        msg_error!(Message::NotLoggedIn);
        return Ok(());
    };

    let slots = ResumeSlots::new()?;
    let Some(state) = slots.fetch(&user.uid)? else {
        msg_print!(Message::NoActiveSession);
        return Ok(());
    };

    let mut table = Table::new();
    if state.is_working {
        let running = daemon::running_pid().map_or_else(|| "not running".to_string(), |pid| format!("running (PID {})", pid));
        table.add_row(row!["STATE", "working"]);
        table.add_row(row!["TRACKER", running]);
    } else {
        table.add_row(row!["STATE", "stopped, awaiting submit"]);
    }

    if let Some(session) = state.current_session.as_ref() {
        table.add_row(row!["DATE", session.date]);
        table.add_row(row!["CLOCK IN", session.clock_in.format("%H:%M:%S")]);
        if let Some(clock_out) = session.clock_out {
            table.add_row(row!["CLOCK OUT", clock_out.format("%H:%M:%S")]);
        }
    }
    table.add_row(row!["ELAPSED", format_duration(&Duration::seconds(state.elapsed_seconds as i64))]);
    table.add_row(row!["IDLE", format!("{} min", state.total_idle_minutes)]);
    table.add_row(row!["SCREENSHOTS", state.screenshots.len()]);
    if let Some(last_saved) = state.last_saved {
        table.add_row(row!["LAST SAVED", last_saved.format("%H:%M:%S")]);
    }
    table.printstd();

    Ok(())
}

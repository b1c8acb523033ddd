//! Clock-in command.
//!
//! The default path checks prerequisites, consults the remote store so a
//! day that already has a submitted session is not clocked into again, and
//! spawns the detached tracker process. The hidden `--tracker-run` flag is
//! how the spawned process re-enters this binary to run the tracking loop
//! itself; `--foreground` does the same in the current terminal.

use crate::api::sessions::{HttpSessionStore, SessionStore};
use crate::commands::require_context;
use crate::libs::daemon;
use crate::libs::messages::Message;
use crate::libs::session::SessionStatus;
use crate::{msg_debug, msg_warning};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Run the tracking loop in the foreground instead of detaching
    #[arg(long)]
    foreground: bool,

    /// Internal flag used by the spawned tracker process
    #[arg(long, hide = true)]
    tracker_run: bool,
}

pub async fn cmd(args: StartArgs) -> Result<()> {
    if args.tracker_run || args.foreground {
        return daemon::run_with_signal_handling().await;
    }

    let Some((server, user)) = require_context()? else {
        return Ok(());
    };

    // One submitted session per day: refuse to clock in again on a day the
    // store already holds a submitted record for. Best effort; an
    // unreachable store defers the check to submission time.
    let store = HttpSessionStore::new(&server.api_url, &user);
    let today = Local::now().date_naive();
    match store.get_by_user_and_date(&user.uid, today).await {
        Ok(Some(session)) if session.status == SessionStatus::Submitted => {
            msg_warning!(Message::AlreadySubmittedToday(today.to_string()));
            return Ok(());
        }
        Ok(_) => {}
        Err(e) => msg_debug!(format!("same-day check skipped: {}", e)),
    }

    daemon::spawn()
}

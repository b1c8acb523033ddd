//! Discards the current session: stops the daemon, clears the resume-slot
//! and all in-memory state. Nothing is written to the remote store.

use crate::commands::{finalizer_tracker, require_context};
use crate::libs::daemon;
use crate::libs::messages::Message;
use crate::{msg_info, msg_success};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let Some((server, user)) = require_context()? else {
        return Ok(());
    };

    daemon::stop()?;

    let mut tracker = finalizer_tracker(&server, &user)?;
    if !tracker.restore()? {
        msg_info!(Message::NoActiveSession);
        return Ok(());
    }

    tracker.cancel_work()?;
    msg_success!(Message::SessionCancelled);
    Ok(())
}

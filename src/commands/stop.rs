//! Clock-out command.
//!
//! Terminates the tracker daemon (its final slot write is the state we
//! finalize), restores the session from the resume-slot, and computes the
//! day's totals. The session stays pending until `submit` or `cancel`.

use crate::commands::{finalizer_tracker, require_context};
use crate::libs::daemon;
use crate::libs::messages::Message;
use crate::libs::tracker::TrackerState;
use crate::libs::view::View;
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

    match tracker.state() {
        TrackerState::Working => {
            tracker.stop_work()?;
            msg_success!(Message::ClockedOut);
            if let Some(session) = tracker.timer().current_session.as_ref() {
                View::session_summary(session);
            }
        }
        _ => msg_info!(Message::AlreadyStopped),
    }

    Ok(())
}

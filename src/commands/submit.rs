//! Submits the stopped session to the remote store.
//!
//! A store failure propagates out of the command so the exit code reflects
//! it and the session stays in place for a retry; tracked data is never
//! lost to a flaky network.

use crate::commands::{finalizer_tracker, require_context};
use crate::libs::messages::Message;
use crate::libs::tracker::TrackerState;
use crate::{msg_info, msg_success, msg_warning};
use anyhow::Result;
use chrono::Local;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input};

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Comment explaining fewer hours than expected
    #[arg(long, short)]
    comment: Option<String>,
}

pub async fn cmd(args: SubmitArgs) -> Result<()> {
    let Some((server, user)) = require_context()? else {
        return Ok(());
    };

    let mut tracker = finalizer_tracker(&server, &user)?;
    if !tracker.restore()? {
        msg_info!(Message::NothingToSubmit);
        return Ok(());
    }

    if tracker.state() == TrackerState::Working {
        msg_warning!(Message::StillWorking);
        return Ok(());
    }

    let comment = match args.comment {
        Some(comment) => Some(comment),
        None => {
            let entered: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptLessHoursComment.to_string())
                .allow_empty(true)
                .interact_text()?;
            if entered.is_empty() {
                None
            } else {
                Some(entered)
            }
        }
    };

    let date = tracker
        .timer()
        .current_session
        .as_ref()
        .map(|s| s.date)
        .unwrap_or_else(|| Local::now().date_naive());

    if let Err(e) = tracker.submit_session(comment).await {
        msg_warning!(Message::SubmitFailed(e.to_string()));
        return Err(e);
    }
    msg_success!(Message::SessionSubmitted(date.to_string()));
    Ok(())
}

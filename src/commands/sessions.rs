//! Lists the user's submitted sessions, newest first, or deletes one by
//! date. Deleting a session re-opens that day for a new one.

use crate::api::sessions::{session_key, HttpSessionStore, SessionStore};
use crate::commands::require_context;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_success};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;

#[derive(Debug, Args)]
pub struct SessionsArgs {
    /// Maximum number of sessions to list
    #[arg(long, short, default_value_t = 30)]
    limit: usize,

    /// Delete the session for a date (YYYY-MM-DD or 'today')
    #[arg(long)]
    delete: Option<String>,
}

pub async fn cmd(args: SessionsArgs) -> Result<()> {
    let Some((server, user)) = require_context()? else {
        return Ok(());
    };

    let store = HttpSessionStore::new(&server.api_url, &user);

    if let Some(date_str) = args.delete {
        let date = parse_date(&date_str)?;
        if store.get_by_user_and_date(&user.uid, date).await?.is_none() {
            msg_info!(Message::SessionNotFoundForDate(date.to_string()));
            return Ok(());
        }
        store.delete(&session_key(&user.uid, date)).await?;
        msg_success!(Message::SessionDeleted(date.to_string()));
        return Ok(());
    }

    let sessions = store.list_by_user(&user.uid, args.limit).await?;
    if sessions.is_empty() {
        msg_info!(Message::NoSessionsFound);
    } else {
        View::sessions(&sessions);
    }
    Ok(())
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    if input == "today" {
        Ok(Local::now().date_naive())
    } else {
        Ok(NaiveDate::parse_from_str(input, "%Y-%m-%d")?)
    }
}

pub mod cancel;
pub mod init;
pub mod login;
pub mod logout;
pub mod sessions;
pub mod start;
pub mod status;
pub mod stop;
pub mod submit;

use crate::api::auth::{self, CurrentUser};
use crate::api::sessions::HttpSessionStore;
use crate::api::uploads::HttpImageSink;
use crate::db::slots::ResumeSlots;
use crate::libs::config::{Config, ServerConfig};
use crate::libs::messages::Message;
use crate::libs::tracker::{NullControls, Tracker};
use crate::msg_error;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init,
    #[command(about = "Log in to the session server")]
    Login,
    #[command(about = "Log out and clear the stored identity")]
    Logout,
    #[command(about = "Clock in and start tracking")]
    Start(start::StartArgs),
    #[command(about = "Clock out and compute the day's totals")]
    Stop,
    #[command(about = "Discard the current session without submitting")]
    Cancel,
    #[command(about = "Submit the stopped session for approval")]
    Submit(submit::SubmitArgs),
    #[command(about = "Show the current tracking state")]
    Status,
    #[command(about = "List or delete submitted sessions")]
    Sessions(sessions::SessionsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init => init::cmd(),
            Commands::Login => login::cmd().await,
            Commands::Logout => logout::cmd(),
            Commands::Start(args) => start::cmd(args).await,
            Commands::Stop => stop::cmd().await,
            Commands::Cancel => cancel::cmd().await,
            Commands::Submit(args) => submit::cmd(args).await,
            Commands::Status => status::cmd(),
            Commands::Sessions(args) => sessions::cmd(args).await,
        }
    }
}

/// Resolves the server config and stored identity, printing the missing
/// prerequisite and returning `None` when either is absent. Commands treat
/// that as a quiet no-op rather than a failure.
pub(crate) fn require_context() -> Result<Option<(ServerConfig, CurrentUser)>> {
    let config = Config::read()?;
    let Some(server) = config.server else {
        msg_error!(Message::ServerNotConfigured);
        return Ok(None);
    };
    let Some(user) = auth::current_user()? else {
        msg_error!(Message::NotLoggedIn);
        return Ok(None);
    };
    Ok(Some((server, user)))
}

/// Builds a tracker over the persisted state for a short-lived command
/// process. No live controllers are attached; the tracker only restores,
/// finalizes, and persists.
pub(crate) fn finalizer_tracker(server: &ServerConfig, user: &CurrentUser) -> Result<Tracker<HttpSessionStore, HttpImageSink>> {
    let store = HttpSessionStore::new(&server.api_url, user);
    let sink = HttpImageSink::new(&server.api_url, user);
    let slots = ResumeSlots::new()?;
    Ok(Tracker::new(&user.uid, slots, store, sink, Box::new(NullControls)))
}

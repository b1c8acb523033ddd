use crate::api::auth::{Auth, LoginCredentials};
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::{msg_error, msg_success};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Password};

/// Prompts for credentials and stores the resulting identity.
pub async fn cmd() -> Result<()> {
    let config = Config::read()?;
    let Some(server) = config.server else {
        msg_error!(Message::ServerNotConfigured);
        return Ok(());
    };

    let email: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptEmail.to_string())
        .interact_text()?;
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .interact()?;

    let auth = Auth::new(&server.api_url);
    match auth.login(&LoginCredentials { email, password }).await {
        Ok(user) => msg_success!(Message::LoggedIn(user.email)),
        Err(e) => msg_error!(Message::LoginFailed(e.to_string())),
    }
    Ok(())
}

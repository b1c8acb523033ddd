use crate::api::auth;
use crate::libs::messages::Message;
use crate::msg_success;
use anyhow::Result;

/// Clears the stored identity. Logging out while logged out is a no-op.
pub fn cmd() -> Result<()> {
    auth::logout()?;
    msg_success!(Message::LoggedOut);
    Ok(())
}

//! Authentication provider.
//!
//! Exchanges credentials for a `{ uid, token }` identity at the auth
//! endpoint and keeps it in a session file under the data directory. The
//! rest of the application treats a missing identity as a hard precondition
//! failure: nothing starts, submits, or resumes without a current user.

use crate::api::ApiError;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;

const SESSION_FILE: &str = ".session";
const LOGIN_URL: &str = "auth/login";

#[derive(Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    uid: String,
    token: String,
}

/// The locally stored identity of the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub uid: String,
    pub email: String,
    pub token: String,
}

pub struct Auth {
    client: Client,
    api_url: String,
}

impl Auth {
    pub fn new(api_url: &str) -> Self {
        Auth {
            client: Client::new(),
            api_url: api_url.to_string(),
        }
    }

    /// Exchanges credentials for an identity and stores it locally.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<CurrentUser> {
        let url = format!("{}/{}", self.api_url, LOGIN_URL);
        let res = self.client.post(url).json(credentials).send().await.map_err(ApiError::from)?;
        if !res.status().is_success() {
            return Err(ApiError::Status(res.status()).into());
        }

        let payload: LoginResponse = res.json().await.map_err(ApiError::from)?;
        let user = CurrentUser {
            uid: payload.uid,
            email: credentials.email.clone(),
            token: payload.token,
        };
        store_user(&user)?;
        Ok(user)
    }
}

/// Reads the stored identity, if any. An unreadable session file counts as
/// logged out.
pub fn current_user() -> Result<Option<CurrentUser>> {
    let path = DataStorage::new().get_path(SESSION_FILE)?;
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw).ok())
}

/// Removes the stored identity. A no-op when not logged in.
pub fn logout() -> Result<()> {
    let path = DataStorage::new().get_path(SESSION_FILE)?;
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

fn store_user(user: &CurrentUser) -> Result<()> {
    let path = DataStorage::new().get_path(SESSION_FILE)?;
    fs::write(path, serde_json::to_string(user)?)?;
    Ok(())
}

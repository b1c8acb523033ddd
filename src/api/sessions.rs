//! Remote session store client.
//!
//! Sessions persist as documents keyed `"{userId}_{YYYY-MM-DD}"`. The key
//! format is load-bearing: saving a second session for the same user and day
//! overwrites the first document, which is exactly how the one-session-per-day
//! invariant is enforced. The `SessionStore` trait is the seam that lets the
//! session lifecycle manager run against an in-memory store in tests.

use crate::api::auth::CurrentUser;
use crate::api::ApiError;
use crate::libs::session::Session;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};

const SESSIONS_URL: &str = "sessions";

/// Builds the composite document key enforcing one session per user per day.
pub fn session_key(user_id: &str, date: NaiveDate) -> String {
    format!("{}_{}", user_id, date.format("%Y-%m-%d"))
}

/// Contract consumed by the session lifecycle manager.
pub trait SessionStore {
    /// Persists `session` under the user+date key, returning the key.
    fn save(&self, user_id: &str, session: &Session) -> impl std::future::Future<Output = Result<String, ApiError>> + Send;

    /// Fetches the session document for a user and calendar day, if any.
    fn get_by_user_and_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Option<Session>, ApiError>> + Send;

    /// Lists the user's sessions ordered by date descending.
    fn list_by_user(&self, user_id: &str, limit: usize) -> impl std::future::Future<Output = Result<Vec<Session>, ApiError>> + Send;

    /// Deletes a session document, re-opening that day for a new session.
    fn delete(&self, session_id: &str) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;
}

/// HTTP implementation of the session store.
pub struct HttpSessionStore {
    client: Client,
    api_url: String,
    token: String,
}

impl HttpSessionStore {
    pub fn new(api_url: &str, user: &CurrentUser) -> Self {
        HttpSessionStore {
            client: Client::new(),
            api_url: api_url.to_string(),
            token: user.token.clone(),
        }
    }

    fn document_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.api_url, SESSIONS_URL, key)
    }
}

impl SessionStore for HttpSessionStore {
    async fn save(&self, user_id: &str, session: &Session) -> Result<String, ApiError> {
        let key = session_key(user_id, session.date);

        // The stored document carries the composite key as its id, so a
        // re-submission for the same day replaces the earlier document.
        let mut doc = session.clone();
        doc.id = key.clone();
        doc.user_id = Some(user_id.to_string());

        let res = self
            .client
            .put(self.document_url(&key))
            .bearer_auth(&self.token)
            .json(&doc)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(ApiError::Status(res.status()));
        }
        Ok(key)
    }

    async fn get_by_user_and_date(&self, user_id: &str, date: NaiveDate) -> Result<Option<Session>, ApiError> {
        let key = session_key(user_id, date);
        let res = self.client.get(self.document_url(&key)).bearer_auth(&self.token).send().await?;

        match res.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(res.json().await?)),
            status => Err(ApiError::Status(status)),
        }
    }

    async fn list_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<Session>, ApiError> {
        let url = format!("{}/{}", self.api_url, SESSIONS_URL);
        let limit = limit.to_string();
        let res = self
            .client
            .get(url)
            .query(&[("user", user_id), ("limit", limit.as_str())])
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(ApiError::Status(res.status()));
        }
        Ok(res.json().await?)
    }

    async fn delete(&self, session_id: &str) -> Result<(), ApiError> {
        let res = self.client.delete(self.document_url(session_id)).bearer_auth(&self.token).send().await?;

        match res.status() {
            StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => Ok(()),
            status => Err(ApiError::Status(status)),
        }
    }
}

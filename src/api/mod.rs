//! HTTP collaborators: authentication, the remote session store, and the
//! screenshot upload sink.

pub mod auth;
pub mod sessions;
pub mod uploads;

use thiserror::Error;

/// Error type for remote calls.
///
/// Transport failures and non-success statuses are kept distinct so callers
/// can report something actionable; only the submit path surfaces these to
/// the user, everything else is contained and logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(reqwest::StatusCode),
}

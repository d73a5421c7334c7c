//! Error taxonomy shared by the library modules.
//!
//! Every failure is recoverable: callers either fall back to retained data
//! (network), show an inline message (validation), or degrade a feature
//! (permission). The CLI wraps these in `anyhow` at the edges.

use thiserror::Error;

/// Errors produced by the reminder engine and its collaborators.
#[derive(Error, Debug)]
pub enum ReminderError {
    /// No signed-in user; the caller should send the user to login.
    #[error("not logged in: {0}")]
    Auth(String),

    /// A geocode, weather, or identity call failed or timed out.
    #[error("network request failed: {0}")]
    Network(String),

    /// User input was rejected before any state changed.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Geolocation or notification permission is missing.
    #[error("permission unavailable: {0}")]
    Permission(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ReminderError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}

impl From<reqwest::Error> for ReminderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network(format!("request timed out: {e}"))
        } else {
            Self::Network(e.to_string())
        }
    }
}

pub type Result<T, E = ReminderError> = std::result::Result<T, E>;

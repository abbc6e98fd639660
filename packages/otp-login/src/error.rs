//! Error types for the login client.
//!
//! These never reach the user directly. The controller logs them and turns
//! them into field messages on the session draft.

use thiserror::Error;

/// Failure talking to the accounts or queue API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server rejected request ({status}): {}", message.as_deref().unwrap_or("no details"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The server answered 2xx but the body was not what we expected.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// The `error` field the server sent back, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Failure persisting client-side session values.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Token store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Token store lock poisoned")]
    Poisoned,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;

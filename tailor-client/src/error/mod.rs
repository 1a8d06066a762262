//! Error types

mod api;
mod auth;

use std::time::Duration;

pub use api::*;
pub use auth::*;

/// Top-level client error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// HTTP 429 after retries were exhausted or disabled.
    #[error("Rate limited{}", retry_hint(.retry_after))]
    RateLimit { retry_after: Option<Duration> },

    /// A request body could not be serialized.
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status, when the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status_code(),
            Self::RateLimit { .. } => Some(429),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.is_retryable(),
            Self::RateLimit { .. } => true,
            _ => false,
        }
    }

    /// Whether the server reported that the record does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    retry_after
        .map(|d| format!(", retry after {:?}", d))
        .unwrap_or_default()
}

use std::time::Duration;

use serde::Deserialize;

/// Failures talking to the ERP backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server's own message, or the raw
    /// body when it carries none.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    /// The body was not the JSON the resource expects.
    #[error("unexpected response: {message}")]
    Parse { message: String, body: Option<String> },
}

/// Error body shapes the backend uses: `{"message": ..}` or `{"error": ..}`.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Build an HTTP error from a response body, preferring the server's
    /// own message field over the raw text.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| body.trim().to_string());
        Self::http(status, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Map a transport error, keeping timeouts distinct.
    pub fn from_reqwest(err: reqwest::Error, timeout: Option<Duration>) -> Self {
        match timeout {
            Some(timeout) if err.is_timeout() => Self::Timeout(timeout),
            _ => Self::Network(err),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Rate limits, gateway and server errors, and transport failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Network(_) | Self::Timeout(_) => true,
            Self::InvalidUrl(_) | Self::Parse { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_prefers_message_field() {
        let err = ApiError::from_body(404, r#"{"message":"Employee not found"}"#);
        assert_eq!(err.to_string(), "HTTP 404: Employee not found");

        let err = ApiError::from_body(400, r#"{"error":"bad month"}"#);
        assert_eq!(err.to_string(), "HTTP 400: bad month");
    }

    #[test]
    fn test_from_body_falls_back_to_text() {
        let err = ApiError::from_body(502, "Bad Gateway\n");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::http(429, "").is_retryable());
        assert!(ApiError::http(503, "").is_retryable());
        assert!(!ApiError::http(404, "").is_retryable());
        assert!(ApiError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!ApiError::parse("eof").is_retryable());
    }
}

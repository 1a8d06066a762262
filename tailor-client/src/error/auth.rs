//! Authentication error types

/// Errors raised while obtaining a bearer token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Access token expired and could not be renewed.
    #[error("Token expired: {message}")]
    TokenExpired { message: String },

    /// The provider has no token to offer.
    #[error("No token available")]
    Missing,
}

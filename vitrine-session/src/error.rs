//! Error types for session resolution

use thiserror::Error;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Session resolution errors
///
/// None of these escape as panics or force callers into error handling: the
/// resolver folds them into its `Failed` state and the snapshot carries the
/// message.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The verification call itself failed (network, timeout, TLS)
    #[error("Identity transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The identity service answered with a non-200 envelope
    #[error("Identity service rejected the token: {code} {message}")]
    Rejected { code: i64, message: String },

    /// The response body did not match the expected envelope
    #[error("Invalid identity payload: {message}")]
    InvalidPayload { message: String },

    /// The HTTP client could not be constructed from configuration
    #[error("HTTP client construction failed: {message}")]
    ClientBuild { message: String },
}

impl SessionError {
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }

    pub fn rejected(code: i64, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }
}

//! API error shape shared across crates

use serde::{Deserialize, Serialize};

/// Error payload surfaced to API consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::new("FETCH_FAILED", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::fetch_failed("upstream timed out");
        assert_eq!(err.to_string(), "FETCH_FAILED: upstream timed out");
    }
}

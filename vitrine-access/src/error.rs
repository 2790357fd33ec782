//! Error types for route protection

use thiserror::Error;
use vitrine_api_types::Role;

/// Result type for access operations
pub type AccessResult<T> = Result<T, AccessError>;

/// Access configuration errors.
///
/// These can only occur while building a table or guard; evaluation itself
/// never fails.
#[derive(Error, Debug)]
pub enum AccessError {
    /// Route path is empty or not absolute
    #[error("Invalid route path: '{path}'")]
    InvalidRoutePath { path: String },

    /// The same path is configured twice
    #[error("Duplicate route path: '{path}'")]
    DuplicateRoute { path: String },

    /// The guard fallback would itself be denied for a role
    #[error("Fallback path '{path}' is not reachable for role {role}")]
    UnreachableFallback { path: String, role: Role },
}

impl AccessError {
    pub fn invalid_route_path(path: impl Into<String>) -> Self {
        Self::InvalidRoutePath { path: path.into() }
    }
}

//! Unified API types for the Vitrine admin console
//!
//! This crate provides the type definitions shared by the access, session
//! and table crates, so that the role model and the wire shapes stay
//! consistent across the workspace.

pub mod enums;
pub mod errors;
pub mod identity;
pub mod list;

// Re-export main types for convenience
pub use enums::Role;
pub use errors::ApiError;
pub use identity::{IdentityPayload, IdentityResponse};
pub use list::{ListMeta, ListResponse};

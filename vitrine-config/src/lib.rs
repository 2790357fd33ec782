//! Domain-driven configuration management for Vitrine
//!
//! Configuration is split by functional domain (routes, session, table,
//! logging), with validation, defaults and environment variable support.
//! The route permission table is loaded here once at process start and is
//! read-only for the rest of the session.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    logging::LoggingConfig, routes::RouteEntryConfig, routes::RouteTableConfig,
    session::SessionConfig, table::TableConfig, VitrineConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;

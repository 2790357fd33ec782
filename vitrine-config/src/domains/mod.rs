//! Domain-specific configuration modules

pub mod logging;
pub mod routes;
pub mod session;
pub mod table;
pub mod utils;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::Validatable;

/// Main Vitrine configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VitrineConfig {
    /// Route permission table and guard fallback
    #[serde(default)]
    pub routes: routes::RouteTableConfig,

    /// Identity verification configuration
    #[serde(default)]
    pub session: session::SessionConfig,

    /// Data table defaults
    #[serde(default)]
    pub table: table::TableConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl VitrineConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.routes.validate()?;
        self.session.validate()?;
        self.table.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = VitrineConfig::default();
        assert!(config.validate_all().is_ok());
    }
}

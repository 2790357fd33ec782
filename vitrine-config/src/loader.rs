//! Configuration loading and environment variable handling

use std::path::Path;

use crate::domains::VitrineConfig;
use crate::error::{ConfigError, ConfigResult};

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "VITRINE".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<VitrineConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: VitrineConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<VitrineConfig> {
        let mut config = VitrineConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<VitrineConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut VitrineConfig) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("VERIFY_URL") {
            config.session.verify_url = url;
        }

        if let Ok(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            let seconds: u64 = timeout
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_TIMEOUT: {}", e)))?;
            config.session.timeout = std::time::Duration::from_secs(seconds);
        }

        if let Ok(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.session.user_agent = user_agent;
        }

        if let Ok(fallback) = self.get_env_var("FALLBACK_PATH") {
            config.routes.fallback_path = fallback;
        }

        if let Ok(size) = self.get_env_var("DEFAULT_PAGE_SIZE") {
            config.table.default_page_size = size
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid DEFAULT_PAGE_SIZE: {}", e)))?;
        }

        if let Ok(size) = self.get_env_var("MAX_PAGE_SIZE") {
            config.table.max_page_size = size
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid MAX_PAGE_SIZE: {}", e)))?;
        }

        if let Ok(level) = self.get_env_var("LOG_LEVEL") {
            config.logging.level = level.parse().map_err(ConfigError::EnvError)?;
        }

        Ok(())
    }

    /// Read a prefixed environment variable
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_env_uses_defaults() {
        let loader = ConfigLoader::with_prefix("VITRINE_TEST_UNSET");
        let config = loader.from_env().unwrap();
        assert_eq!(config.table.default_page_size, 10);
        assert_eq!(config.routes.fallback_path, "/dashboard");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
table:
  default_page_size: 25
session:
  verify_url: "http://identity.internal/api/auth/verify"
  timeout: 5
"#
        )
        .unwrap();

        let loader = ConfigLoader::with_prefix("VITRINE_TEST_UNSET");
        let config = loader.from_file(file.path()).unwrap();
        assert_eq!(config.table.default_page_size, 25);
        assert_eq!(config.session.timeout, std::time::Duration::from_secs(5));
        // Untouched domains keep their defaults
        assert_eq!(config.routes.fallback_path, "/dashboard");
    }

    #[test]
    fn test_invalid_file_content_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
table:
  default_page_size: 0
"#
        )
        .unwrap();

        let loader = ConfigLoader::with_prefix("VITRINE_TEST_UNSET");
        assert!(loader.from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_override() {
        // Unique prefix so parallel tests cannot interfere
        std::env::set_var("VITRINE_LOADER_T1_DEFAULT_PAGE_SIZE", "50");
        let loader = ConfigLoader::with_prefix("VITRINE_LOADER_T1");
        let config = loader.from_env().unwrap();
        assert_eq!(config.table.default_page_size, 50);
        std::env::remove_var("VITRINE_LOADER_T1_DEFAULT_PAGE_SIZE");
    }
}

//! Data table defaults

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};

/// Pagination defaults applied when the URL carries no explicit values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Page size used when the query string does not specify one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound a decoded page size is clamped to
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Validatable for TableConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.default_page_size, "default_page_size", self.domain_name())?;
        validate_positive(self.max_page_size, "max_page_size", self.domain_name())?;
        if self.default_page_size > self.max_page_size {
            return Err(self.validation_error(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "table"
    }
}

// Default value functions
fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

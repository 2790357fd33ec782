//! Route permission table configuration
//!
//! The table is static: loaded at process start, read-only afterwards. An
//! entry with an empty role list is open to every authenticated role; a path
//! with no entry at all is unprotected.

use serde::{Deserialize, Serialize};
use vitrine_api_types::Role;

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};

/// Association of a route path with the roles allowed to enter it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntryConfig {
    /// Route path, exact or segment prefix (`/dashboard/orders` also covers
    /// `/dashboard/orders/123`)
    pub path: String,

    /// Allowed roles; empty means any authenticated role
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl RouteEntryConfig {
    pub fn open(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            roles: Vec::new(),
        }
    }

    pub fn restricted(path: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            path: path.into(),
            roles,
        }
    }

    /// Whether this entry admits the given role
    pub fn allows(&self, role: Role) -> bool {
        role == Role::Admin || self.roles.is_empty() || self.roles.contains(&role)
    }
}

/// Route permission table plus the guard fallback path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTableConfig {
    /// Where the guard sends a denied visitor
    #[serde(default = "default_fallback_path")]
    pub fallback_path: String,

    /// Protected route entries
    #[serde(default = "default_entries")]
    pub entries: Vec<RouteEntryConfig>,
}

impl Default for RouteTableConfig {
    fn default() -> Self {
        Self {
            fallback_path: default_fallback_path(),
            entries: default_entries(),
        }
    }
}

impl RouteTableConfig {
    /// Entry that governs `path`: exact match first, else the longest
    /// segment-boundary prefix
    pub fn matching_entry(&self, path: &str) -> Option<&RouteEntryConfig> {
        self.entries
            .iter()
            .filter(|entry| path_covers(&entry.path, path))
            .max_by_key(|entry| entry.path.len())
    }
}

/// Segment-boundary prefix test: `/dashboard/orders` covers
/// `/dashboard/orders/123` but not `/dashboard/orders-archive`
fn path_covers(entry_path: &str, path: &str) -> bool {
    path == entry_path
        || path
            .strip_prefix(entry_path)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl Validatable for RouteTableConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.fallback_path, "fallback_path", self.domain_name())?;
        if !self.fallback_path.starts_with('/') {
            return Err(self.validation_error(format!(
                "fallback_path must be absolute, got '{}'",
                self.fallback_path
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for entry in &self.entries {
            validate_required_string(&entry.path, "path", self.domain_name())?;
            if !entry.path.starts_with('/') {
                return Err(self.validation_error(format!(
                    "route path must be absolute, got '{}'",
                    entry.path
                )));
            }
            if entry.path.len() > 1 && entry.path.ends_with('/') {
                return Err(self.validation_error(format!(
                    "route path must not end with a slash: '{}'",
                    entry.path
                )));
            }
            if !seen.insert(entry.path.as_str()) {
                return Err(self.validation_error(format!("duplicate route path '{}'", entry.path)));
            }
        }

        // The guard redirects denied visitors to fallback_path, so the
        // fallback must admit every role or a denial would loop.
        if let Some(entry) = self.matching_entry(&self.fallback_path) {
            for role in Role::ALL {
                if !entry.allows(role) {
                    return Err(self.validation_error(format!(
                        "fallback_path '{}' is not reachable for role {}",
                        self.fallback_path, role
                    )));
                }
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "routes"
    }
}

// Default value functions
fn default_fallback_path() -> String {
    "/dashboard".to_string()
}

/// The console's dashboard map: seller-facing sections are open to any
/// authenticated role, management sections are admin-only.
fn default_entries() -> Vec<RouteEntryConfig> {
    vec![
        RouteEntryConfig::open("/dashboard"),
        RouteEntryConfig::open("/dashboard/products"),
        RouteEntryConfig::open("/dashboard/categories"),
        RouteEntryConfig::open("/dashboard/orders"),
        RouteEntryConfig::open("/dashboard/profile"),
        RouteEntryConfig::restricted("/dashboard/promotions", vec![Role::Admin]),
        RouteEntryConfig::restricted("/dashboard/manage-seller", vec![Role::Admin]),
        RouteEntryConfig::restricted("/dashboard/manage-admins", vec![Role::Admin]),
        RouteEntryConfig::restricted("/dashboard/users", vec![Role::Admin]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        assert!(RouteTableConfig::default().validate().is_ok());
    }

    #[test]
    fn test_matching_entry_prefers_longest_prefix() {
        let config = RouteTableConfig::default();
        let entry = config.matching_entry("/dashboard/manage-seller/42").unwrap();
        assert_eq!(entry.path, "/dashboard/manage-seller");
    }

    #[test]
    fn test_segment_boundary_matching() {
        let config = RouteTableConfig::default();
        // A sibling path sharing a textual prefix matches only /dashboard
        let entry = config.matching_entry("/dashboard/orders-archive").unwrap();
        assert_eq!(entry.path, "/dashboard");
    }

    #[test]
    fn test_restricted_fallback_is_rejected() {
        let config = RouteTableConfig {
            fallback_path: "/dashboard".to_string(),
            entries: vec![RouteEntryConfig::restricted(
                "/dashboard",
                vec![Role::Admin],
            )],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_paths_are_rejected() {
        let config = RouteTableConfig {
            fallback_path: "/dashboard".to_string(),
            entries: vec![
                RouteEntryConfig::open("/dashboard/orders"),
                RouteEntryConfig::open("/dashboard/orders"),
            ],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_path_is_rejected() {
        let config = RouteTableConfig {
            fallback_path: "/dashboard".to_string(),
            entries: vec![RouteEntryConfig::open("dashboard/orders")],
        };
        assert!(config.validate().is_err());
    }
}

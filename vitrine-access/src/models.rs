//! Route permission model and access evaluation

use std::collections::HashSet;

use vitrine_api_types::Role;
use vitrine_config::RouteTableConfig;

use crate::error::{AccessError, AccessResult};

/// One protected route: a path pattern plus the roles allowed through it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePermission {
    /// Exact path or segment prefix
    pub path: String,
    /// Allowed roles; empty means any authenticated role
    pub allowed_roles: Vec<Role>,
}

impl RoutePermission {
    pub fn new(path: impl Into<String>, allowed_roles: Vec<Role>) -> Self {
        Self {
            path: path.into(),
            allowed_roles,
        }
    }

    /// Whether this entry admits the given role. Admin always passes.
    pub fn allows(&self, role: Role) -> bool {
        role == Role::Admin || self.allowed_roles.is_empty() || self.allowed_roles.contains(&role)
    }

    /// Segment count of the pattern, used for specificity ordering
    fn segments(&self) -> usize {
        self.path.split('/').filter(|s| !s.is_empty()).count()
    }
}

/// Pre-sorted route permission table.
///
/// Entries are ordered by specificity (segment count, then pattern length)
/// so one deterministic pass finds the governing entry: an exact match is
/// always the most specific candidate, otherwise the longest segment-aware
/// prefix wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RoutePermission>,
}

impl RouteTable {
    /// Build a table from validated configuration
    pub fn from_config(config: &RouteTableConfig) -> AccessResult<Self> {
        let entries = config
            .entries
            .iter()
            .map(|entry| RoutePermission::new(entry.path.clone(), entry.roles.clone()))
            .collect();
        Self::new(entries)
    }

    /// Build a table from explicit entries
    pub fn new(mut entries: Vec<RoutePermission>) -> AccessResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.path.is_empty() || !entry.path.starts_with('/') {
                return Err(AccessError::invalid_route_path(&entry.path));
            }
            if entry.path.len() > 1 && entry.path.ends_with('/') {
                return Err(AccessError::invalid_route_path(&entry.path));
            }
            if !seen.insert(entry.path.clone()) {
                return Err(AccessError::DuplicateRoute {
                    path: entry.path.clone(),
                });
            }
        }

        entries.sort_by(|a, b| {
            b.segments()
                .cmp(&a.segments())
                .then_with(|| b.path.len().cmp(&a.path.len()))
                .then_with(|| a.path.cmp(&b.path))
        });

        Ok(Self { entries })
    }

    /// Whether any entry governs `path`
    pub fn is_protected(&self, path: &str) -> bool {
        self.match_entry(path).is_some()
    }

    /// Roles admitted at `path`; `None` means the path is unprotected, an
    /// empty slice means any authenticated role
    pub fn allowed_roles(&self, path: &str) -> Option<&[Role]> {
        self.match_entry(path)
            .map(|entry| entry.allowed_roles.as_slice())
    }

    /// Pure access decision for a resolved role.
    ///
    /// Admin always passes; unprotected paths always pass; an empty allowed
    /// set passes any resolved role; otherwise set membership decides.
    pub fn has_access(&self, role: Role, path: &str) -> bool {
        match self.match_entry(path) {
            Some(entry) => entry.allows(role),
            None => true,
        }
    }

    /// The entry governing `path`, if any
    pub fn match_entry(&self, path: &str) -> Option<&RoutePermission> {
        let path = normalize_path(path);
        self.entries
            .iter()
            .find(|entry| path_covers(&entry.path, path))
    }

    /// All configured entries, most specific first
    pub fn entries(&self) -> &[RoutePermission] {
        &self.entries
    }
}

/// Strip query, fragment and trailing slash before matching
fn normalize_path(path: &str) -> &str {
    let path = path
        .split_once('?')
        .map_or(path, |(before, _)| before);
    let path = path
        .split_once('#')
        .map_or(path, |(before, _)| before);
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
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

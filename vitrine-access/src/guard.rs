//! Route guard
//!
//! Consulted on every navigation. While the session is resolving the guard
//! suspends (renders a placeholder); once resolved it either lets the
//! navigation through or redirects to the configured fallback path.

use std::sync::Arc;

use tracing::debug;
use vitrine_api_types::Role;
use vitrine_config::RouteTableConfig;
use vitrine_session::{SessionSnapshot, SessionState};

use crate::error::{AccessError, AccessResult};
use crate::models::RouteTable;

/// Outcome of consulting the guard for one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving: render a placeholder, make no access call
    Pending,
    /// Navigation may proceed
    Allow,
    /// Access denied: redirect to the contained path
    Redirect(String),
    /// Access denied at the fallback path itself, where a redirect would
    /// loop; callers must render a denial instead
    Deny,
}

/// Enforces the route permission table for a session
#[derive(Debug, Clone)]
pub struct RouteGuard {
    table: Arc<RouteTable>,
    fallback_path: String,
}

impl RouteGuard {
    /// Create a guard over `table` redirecting denials to `fallback_path`.
    ///
    /// The fallback must be reachable for every role, otherwise a denial
    /// would redirect into another denial.
    pub fn new(table: Arc<RouteTable>, fallback_path: impl Into<String>) -> AccessResult<Self> {
        let fallback_path = fallback_path.into();
        for role in Role::ALL {
            if !table.has_access(role, &fallback_path) {
                return Err(AccessError::UnreachableFallback {
                    path: fallback_path,
                    role,
                });
            }
        }
        Ok(Self {
            table,
            fallback_path,
        })
    }

    /// Build table and guard in one step from configuration
    pub fn from_config(config: &RouteTableConfig) -> AccessResult<Self> {
        let table = Arc::new(RouteTable::from_config(config)?);
        Self::new(table, config.fallback_path.clone())
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn fallback_path(&self) -> &str {
        &self.fallback_path
    }

    /// Decide one navigation.
    ///
    /// Pure apart from logging; the redirect itself is the caller's side
    /// effect.
    pub fn decide(&self, session: &SessionSnapshot, path: &str) -> GuardDecision {
        match &session.state {
            SessionState::Resolving => GuardDecision::Pending,
            SessionState::Resolved(Some(role)) => {
                if self.table.has_access(*role, path) {
                    GuardDecision::Allow
                } else {
                    self.deny(path)
                }
            }
            // Authenticated but role-less: open entries ("any authenticated
            // role") still admit, restricted entries deny
            SessionState::Resolved(None) => match self.table.allowed_roles(path) {
                None => GuardDecision::Allow,
                Some(roles) if roles.is_empty() => GuardDecision::Allow,
                Some(_) => self.deny(path),
            },
            // No verified session: every protected path denies
            SessionState::Idle | SessionState::Failed => {
                if self.table.is_protected(path) {
                    self.deny(path)
                } else {
                    GuardDecision::Allow
                }
            }
        }
    }

    fn deny(&self, path: &str) -> GuardDecision {
        if trimmed(path) == trimmed(&self.fallback_path) {
            debug!(path, "denied at the fallback path, refusing to self-redirect");
            GuardDecision::Deny
        } else {
            debug!(path, fallback = %self.fallback_path, "redirecting denied navigation");
            GuardDecision::Redirect(self.fallback_path.clone())
        }
    }
}

fn trimmed(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

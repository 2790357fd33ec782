//! Identity verification wire types
//!
//! The identity service answers a token verification call with a
//! `{code, message, payload}` envelope. `code == 200` signals success;
//! everything else means the token was rejected.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// Envelope returned by the identity verification endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<IdentityPayload>,
}

impl IdentityResponse {
    /// Whether the verification succeeded
    pub fn is_success(&self) -> bool {
        self.code == 200
    }
}

/// Verified identity attributes carried in a successful envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityPayload {
    /// Role as reported by the identity service, not yet coerced
    pub role: String,
    pub user_id: String,
    /// Opaque profile attributes, passed through untouched
    #[serde(default)]
    pub user_info: HashMap<String, serde_json::Value>,
}

impl IdentityPayload {
    /// Coerce the reported role string onto the [`Role`] enum.
    ///
    /// Unknown values resolve to `None` so a newer identity service never
    /// breaks an older console.
    pub fn resolved_role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

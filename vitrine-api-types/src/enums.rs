use serde::{Deserialize, Serialize};

/// Coarse-grained permission tag attached to an authenticated identity.
///
/// The identity service reports roles as free-form strings; [`Role::parse`]
/// is the single place those strings are coerced into the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Seller,
}

impl Role {
    /// Every role the console knows about.
    pub const ALL: [Role; 2] = [Role::Admin, Role::Seller];

    /// Total coercion from an untrusted role string.
    ///
    /// Unknown values yield `None` (treated as "no role" by callers), never
    /// an error or a panic.
    pub fn parse(value: &str) -> Option<Role> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "SELLER" => Some(Role::Seller),
            _ => None,
        }
    }

    /// Wire representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Seller => "SELLER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

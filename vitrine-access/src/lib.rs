//! Role-based route protection for the Vitrine admin console
//!
//! The route permission table is static configuration; evaluation is a pure
//! function of (role, path, table). The guard layers the session lifecycle
//! on top: a resolving session blocks rendering instead of denying, and a
//! denial redirects to the configured fallback path.

pub mod error;
pub mod guard;
pub mod middleware;
pub mod models;

pub use error::{AccessError, AccessResult};
pub use guard::{GuardDecision, RouteGuard};
pub use middleware::{guard_middleware, GuardState};
pub use models::{RoutePermission, RouteTable};

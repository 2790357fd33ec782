//! Axum adaptation of the route guard
//!
//! The guard runs as a middleware layer over the dashboard router: one
//! decision per request, with the redirect as its only side effect. On
//! `Allow` the session snapshot is inserted into request extensions for
//! handlers further down.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use tracing::debug;
use vitrine_session::SessionResolver;

use crate::guard::{GuardDecision, RouteGuard};

/// Shared state for [`guard_middleware`]
#[derive(Clone)]
pub struct GuardState {
    pub guard: Arc<RouteGuard>,
    pub resolver: Arc<SessionResolver>,
}

impl GuardState {
    pub fn new(guard: Arc<RouteGuard>, resolver: Arc<SessionResolver>) -> Self {
        Self { guard, resolver }
    }
}

/// Enforce the route guard for one request
pub async fn guard_middleware(
    State(state): State<GuardState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let snapshot = state.resolver.snapshot();

    match state.guard.decide(&snapshot, &path) {
        GuardDecision::Pending => {
            debug!(%path, "session resolving, rendering placeholder");
            (StatusCode::OK, Json(json!({ "state": "resolving" }))).into_response()
        }
        GuardDecision::Allow => {
            request.extensions_mut().insert(snapshot);
            next.run(request).await
        }
        GuardDecision::Redirect(target) => Redirect::to(&target).into_response(),
        GuardDecision::Deny => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": {
                    "code": "FORBIDDEN",
                    "message": "Access denied"
                }
            })),
        )
            .into_response(),
    }
}

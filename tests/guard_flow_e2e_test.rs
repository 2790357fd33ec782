//! End-to-end route guard scenarios
//!
//! Wires configuration, session resolution and the guard middleware into a
//! dashboard router and drives it with plain HTTP requests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http, http::StatusCode, routing::get, Router};
use tokio::sync::Notify;
use tower::ServiceExt;
use vitrine_access::{guard_middleware, GuardState, RouteGuard};
use vitrine_api_types::{IdentityPayload, IdentityResponse};
use vitrine_config::ConfigLoader;
use vitrine_session::{AuthToken, IdentityVerifier, SessionResolver, SessionResult, SessionState};

/// Identity service double: verdict per call, optionally gated so a test can
/// observe the resolving window
struct ScriptedVerifier {
    code: i64,
    role: &'static str,
    gate: Option<Arc<Notify>>,
}

impl ScriptedVerifier {
    fn accepting(role: &'static str) -> Self {
        Self {
            code: 200,
            role,
            gate: None,
        }
    }

    fn rejecting(code: i64) -> Self {
        Self {
            code,
            role: "",
            gate: None,
        }
    }

    fn gated(role: &'static str, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::accepting(role)
        }
    }
}

#[async_trait]
impl IdentityVerifier for ScriptedVerifier {
    async fn verify(&self, _token: &AuthToken) -> SessionResult<IdentityResponse> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.code != 200 {
            return Ok(IdentityResponse {
                code: self.code,
                message: "verification rejected".to_string(),
                payload: None,
            });
        }
        Ok(IdentityResponse {
            code: 200,
            message: "ok".to_string(),
            payload: Some(IdentityPayload {
                role: self.role.to_string(),
                user_id: "user-1".to_string(),
                user_info: Default::default(),
            }),
        })
    }
}

fn init_tracing() {
    // Minimal subscriber so guard decisions show up under RUST_LOG
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .without_time()
        .try_init();
}

fn dashboard_router(resolver: Arc<SessionResolver>) -> Router {
    init_tracing();
    let config = ConfigLoader::with_prefix("VITRINE_E2E_UNSET")
        .from_env()
        .expect("default config loads");
    let guard = Arc::new(RouteGuard::from_config(&config.routes).expect("guard builds"));
    Router::new()
        .route("/dashboard", get(|| async { "overview" }))
        .route("/dashboard/orders", get(|| async { "orders" }))
        .route("/dashboard/manage-seller", get(|| async { "sellers" }))
        .layer(axum::middleware::from_fn_with_state(
            GuardState::new(guard, resolver),
            guard_middleware,
        ))
}

fn get_request(path: &str) -> http::Request<Body> {
    http::Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn seller_is_redirected_from_admin_only_route() {
    let resolver = Arc::new(SessionResolver::new(Arc::new(ScriptedVerifier::accepting(
        "SELLER",
    ))));
    resolver.resolve(AuthToken::new("seller-token")).await;
    let app = dashboard_router(resolver);

    let response = app
        .oneshot(get_request("/dashboard/manage-seller"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[http::header::LOCATION], "/dashboard");
}

#[tokio::test]
async fn admin_passes_admin_only_route() {
    let resolver = Arc::new(SessionResolver::new(Arc::new(ScriptedVerifier::accepting(
        "ADMIN",
    ))));
    resolver.resolve(AuthToken::new("admin-token")).await;
    let app = dashboard_router(resolver);

    let response = app
        .oneshot(get_request("/dashboard/manage-seller"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn seller_reaches_shared_routes_and_their_children() {
    let resolver = Arc::new(SessionResolver::new(Arc::new(ScriptedVerifier::accepting(
        "SELLER",
    ))));
    resolver.resolve(AuthToken::new("seller-token")).await;
    let app = dashboard_router(resolver);

    for path in ["/dashboard", "/dashboard/orders"] {
        let response = app.clone().oneshot(get_request(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "path {}", path);
    }
}

#[tokio::test]
async fn resolving_session_renders_placeholder_instead_of_redirecting() {
    let gate = Arc::new(Notify::new());
    let resolver = Arc::new(SessionResolver::new(Arc::new(ScriptedVerifier::gated(
        "ADMIN",
        gate.clone(),
    ))));

    // Park resolution inside the verifier so the session stays resolving
    let resolving = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.resolve(AuthToken::new("slow-token")).await })
    };
    tokio::task::yield_now().await;
    assert_eq!(resolver.snapshot().state, SessionState::Resolving);

    let app = dashboard_router(resolver.clone());
    let response = app
        .clone()
        .oneshot(get_request("/dashboard/manage-seller"))
        .await
        .unwrap();

    // No redirect decision is made while the session is indeterminate
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["state"], "resolving");

    // Once resolved, the same navigation goes through
    gate.notify_one();
    resolving.await.unwrap();
    let response = app
        .oneshot(get_request("/dashboard/manage-seller"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn failed_verification_forces_logout_and_denies_protected_routes() {
    let resolver = Arc::new(SessionResolver::new(Arc::new(ScriptedVerifier::rejecting(
        401,
    ))));
    let snapshot = resolver.resolve(AuthToken::new("expired-token")).await;
    assert_eq!(snapshot.state, SessionState::Failed);
    assert!(snapshot.error.is_some());

    let app = dashboard_router(resolver);
    let response = app.oneshot(get_request("/dashboard/orders")).await.unwrap();

    // The visitor is treated as unauthenticated from here on
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[http::header::LOCATION], "/dashboard");
}

#[tokio::test]
async fn role_less_session_reaches_open_routes_only() {
    let resolver = Arc::new(SessionResolver::new(Arc::new(ScriptedVerifier::accepting(
        "AUDITOR",
    ))));
    resolver.resolve(AuthToken::new("token")).await;
    let app = dashboard_router(resolver);

    let open = app
        .clone()
        .oneshot(get_request("/dashboard/orders"))
        .await
        .unwrap();
    assert_eq!(open.status(), StatusCode::OK);

    let restricted = app
        .oneshot(get_request("/dashboard/manage-seller"))
        .await
        .unwrap();
    assert_eq!(restricted.status(), StatusCode::SEE_OTHER);
}

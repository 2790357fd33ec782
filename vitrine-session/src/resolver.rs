//! Session state machine
//!
//! One resolver instance lives for the browser session. `resolve` drives the
//! `Idle -> Resolving -> Resolved | Failed` transitions; a failure forces
//! logout (the token is dropped) and is terminal until a new token arrives.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vitrine_api_types::Role;

use crate::error::SessionError;
use crate::token::AuthToken;
use crate::verifier::IdentityVerifier;

/// Lifecycle of the resolved role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No token seen yet
    Idle,
    /// Verification call in flight; access is indeterminate
    Resolving,
    /// Verification succeeded; `None` means the identity service reported a
    /// role this console does not know
    Resolved(Option<Role>),
    /// Verification failed; terminal until a new login supplies a token
    Failed,
}

/// Cheap copy of the session handed to consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub user_id: Option<String>,
    /// Failure reason when `state` is [`SessionState::Failed`]
    pub error: Option<String>,
}

impl SessionSnapshot {
    fn idle() -> Self {
        Self {
            state: SessionState::Idle,
            user_id: None,
            error: None,
        }
    }

    fn resolving() -> Self {
        Self {
            state: SessionState::Resolving,
            user_id: None,
            error: None,
        }
    }

    /// Resolved role, `None` while loading, failed or role-less
    pub fn role(&self) -> Option<Role> {
        match self.state {
            SessionState::Resolved(role) => role,
            _ => None,
        }
    }

    /// Whether consumers must treat access as indeterminate
    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Resolving
    }

    /// Whether the token was verified, regardless of role
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Resolved(_))
    }
}

struct Inner {
    token: Option<AuthToken>,
    /// Bumped on every (re-)resolution; a completed verification whose epoch
    /// no longer matches is discarded
    epoch: u64,
}

/// Resolves the current user's role from the bearer token
pub struct SessionResolver {
    id: Uuid,
    verifier: Arc<dyn IdentityVerifier>,
    inner: Mutex<Inner>,
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionResolver {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::idle());
        let id = Uuid::new_v4();
        debug!(session = %id, "session resolver created");
        Self {
            id,
            verifier,
            inner: Mutex::new(Inner {
                token: None,
                epoch: 0,
            }),
            tx,
        }
    }

    /// Point-in-time read of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// Resolve the role for `token`.
    ///
    /// A token already resolved is a no-op; a new token identity restarts
    /// resolution. The returned snapshot is also published to subscribers.
    pub async fn resolve(&self, token: AuthToken) -> SessionSnapshot {
        self.resolve_inner(token, false).await
    }

    /// Force re-verification of the current token, if any
    pub async fn refresh(&self) -> SessionSnapshot {
        let token = self.inner.lock().expect("resolver lock").token.clone();
        match token {
            Some(token) => self.resolve_inner(token, true).await,
            None => self.snapshot(),
        }
    }

    /// Drop the token and return to the idle state
    pub fn logout(&self) {
        let mut inner = self.inner.lock().expect("resolver lock");
        inner.token = None;
        inner.epoch += 1;
        info!(session = %self.id, "session logged out");
        self.tx.send_replace(SessionSnapshot::idle());
    }

    async fn resolve_inner(&self, token: AuthToken, force: bool) -> SessionSnapshot {
        let epoch = {
            let mut inner = self.inner.lock().expect("resolver lock");
            let current = self.tx.borrow().clone();
            let same_token = inner.token.as_ref() == Some(&token);
            if !force && same_token && matches!(current.state, SessionState::Resolved(_)) {
                return current;
            }
            inner.token = Some(token.clone());
            inner.epoch += 1;
            inner.epoch
        };

        self.tx.send_replace(SessionSnapshot::resolving());
        let outcome = self.verifier.verify(&token).await;

        let mut inner = self.inner.lock().expect("resolver lock");
        if inner.epoch != epoch {
            debug!(session = %self.id, "discarding identity response for a superseded token");
            return self.tx.borrow().clone();
        }

        let snapshot = match outcome {
            Ok(envelope) if envelope.is_success() => match envelope.payload {
                Some(payload) => {
                    let role = payload.resolved_role();
                    if role.is_none() {
                        warn!(session = %self.id, role = %payload.role,
                              "identity service reported an unknown role");
                    }
                    info!(session = %self.id, user_id = %payload.user_id, "session resolved");
                    SessionSnapshot {
                        state: SessionState::Resolved(role),
                        user_id: Some(payload.user_id),
                        error: None,
                    }
                }
                None => self.invalidate(
                    &mut inner,
                    SessionError::invalid_payload("success envelope without payload"),
                ),
            },
            Ok(envelope) => self.invalidate(
                &mut inner,
                SessionError::rejected(envelope.code, envelope.message),
            ),
            Err(err) => self.invalidate(&mut inner, err),
        };

        self.tx.send_replace(snapshot.clone());
        snapshot
    }

    /// Forced logout: drop the token and record the failure reason
    fn invalidate(&self, inner: &mut Inner, reason: SessionError) -> SessionSnapshot {
        warn!(session = %self.id, error = %reason, "session invalidated, forcing logout");
        inner.token = None;
        SessionSnapshot {
            state: SessionState::Failed,
            user_id: None,
            error: Some(reason.to_string()),
        }
    }
}

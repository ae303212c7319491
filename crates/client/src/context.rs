//! Session context: the single, process-wide source of truth for "who is
//! logged in".
//!
//! The broadcast value lives in a [`SessionCell`] (a `tokio::sync::watch`
//! channel). Only this module writes it: [`SessionContext`] on login/logout,
//! and [`SessionTerminator`] (the narrow capability handed to the gateway) when
//! the backend answers 401.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::watch;

use sgms_auth::{Decision, RoutePolicy, decide, decide_path};
use sgms_core::{Identity, Lifecycle, Role, Session};

use crate::auth_service::AuthService;
use crate::error::ApiResult;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("session context already initialized")]
    AlreadyInitialized,
}

/// Holder of the broadcast session value.
#[derive(Debug)]
pub struct SessionCell {
    tx: watch::Sender<Session>,
    initialized: AtomicBool,
}

impl SessionCell {
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = watch::channel(Session::Uninitialized);
        Arc::new(Self {
            tx,
            initialized: AtomicBool::new(false),
        })
    }

    pub fn terminator(self: &Arc<Self>) -> SessionTerminator {
        SessionTerminator { cell: self.clone() }
    }

    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.tx.borrow().lifecycle()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    fn publish(&self, session: Session) {
        self.tx.send_replace(session);
    }
}

/// Write capability that can only end the session.
#[derive(Debug, Clone)]
pub struct SessionTerminator {
    cell: Arc<SessionCell>,
}

impl SessionTerminator {
    /// Force the broadcast to `Anonymous`. Subscribers are only notified when
    /// the state actually changes, so concurrent 401s notify once.
    pub fn force_anonymous(&self) -> bool {
        self.cell.tx.send_if_modified(|session| {
            if matches!(session, Session::Anonymous) {
                false
            } else {
                *session = Session::Anonymous;
                true
            }
        })
    }
}

/// The reactive session singleton consumed by the UI layer.
#[derive(Debug)]
pub struct SessionContext {
    cell: Arc<SessionCell>,
    auth: AuthService,
    policy: Arc<RoutePolicy>,
}

impl SessionContext {
    /// Read persisted state and leave `Uninitialized` before anything can
    /// subscribe through this context.
    ///
    /// One context per cell: a second call fails with
    /// [`ContextError::AlreadyInitialized`].
    pub fn initialize(
        cell: Arc<SessionCell>,
        auth: AuthService,
        policy: Arc<RoutePolicy>,
    ) -> Result<Self, ContextError> {
        if cell.initialized.swap(true, Ordering::SeqCst) {
            return Err(ContextError::AlreadyInitialized);
        }

        let session = Session::from_stored(auth.stored_session());
        tracing::info!(lifecycle = ?session.lifecycle(), "session context initialized");
        cell.publish(session);

        Ok(Self { cell, auth, policy })
    }

    pub fn current(&self) -> Session {
        self.cell.current()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.cell.lifecycle()
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.cell.current().identity().cloned()
    }

    pub fn user_role(&self) -> Option<Role> {
        self.cell.current().role()
    }

    pub fn is_authenticated(&self) -> bool {
        self.cell.current().is_authenticated()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.cell.subscribe()
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    /// Log in and broadcast whatever the store now holds. If the session
    /// could not be persisted the broadcast stays `Anonymous`.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Identity> {
        let session = self.auth.login_session(email, password).await?;
        self.cell.publish(Session::from_stored(self.auth.stored_session()));
        Ok(session.identity)
    }

    pub fn logout(&self) {
        self.auth.logout();
        self.cell.publish(Session::Anonymous);
    }

    /// Guard decision for a view requiring one of `required`.
    pub fn authorize(&self, required: &[Role]) -> Decision {
        let decision = decide(&self.current(), required, &self.policy);
        tracing::debug!(
            allowed = decision.is_allowed(),
            reason = %decision.explain(),
            "guard decision"
        );
        decision
    }

    /// Guard decision for a concrete route.
    pub fn authorize_path(&self, path: &str) -> Decision {
        let decision = decide_path(&self.current(), path, &self.policy);
        tracing::debug!(
            path,
            allowed = decision.is_allowed(),
            reason = %decision.explain(),
            "guard decision"
        );
        decision
    }
}

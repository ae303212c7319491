//! Headless navigator: tracks the current location, runs the guard on every
//! visit and applies redirects requested over the session event bus.

use std::sync::{Arc, Mutex, PoisonError};

use sgms_auth::Decision;
use sgms_events::{EventBus, SessionEvent, Subscription};

use crate::context::SessionContext;
use crate::gateway::SessionBus;

#[derive(Debug)]
pub struct Navigator {
    context: Arc<SessionContext>,
    events: Subscription<SessionEvent>,
    location: Mutex<String>,
}

impl Navigator {
    pub fn new(context: Arc<SessionContext>, bus: &SessionBus, initial: impl Into<String>) -> Self {
        Self {
            context,
            events: bus.subscribe(),
            location: Mutex::new(initial.into()),
        }
    }

    pub fn location(&self) -> String {
        self.location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Try to open `path`. On denial the navigator lands on the redirect target
    /// instead.
    pub fn visit(&self, path: &str) -> Decision {
        let decision = self.context.authorize_path(path);
        let target = decision.redirect_path().unwrap_or(path);
        self.set_location(target);
        decision
    }

    /// Apply queued redirect events. Returns where navigation ended up, or
    /// `None` when nothing moved (including redirects to the current location).
    pub fn pump(&self) -> Option<String> {
        let mut moved = None;
        for event in self.events.drain() {
            let Some(target) = event.redirect_to() else {
                continue;
            };
            if self.location() == target {
                tracing::debug!(target, "already at redirect target");
                continue;
            }
            tracing::info!(target, "redirecting");
            self.set_location(target);
            moved = Some(target.to_string());
        }
        moved
    }

    fn set_location(&self, path: &str) {
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::{Harness, StubTransport};
    use crate::transport::HttpResponse;
    use serde_json::json;

    #[tokio::test]
    async fn unauthorized_redirects_once() {
        let expired = StubTransport::always(HttpResponse::json(401, &json!({})));
        let harness = Harness::logged_in(expired);
        let nav = Navigator::new(harness.context.clone(), &harness.events, "/guards");

        let (a, b) = tokio::join!(harness.api.get("/guards"), harness.api.get("/sites"));
        assert_eq!(a.unwrap_err().kind(), ErrorKind::Unauthorized);
        assert_eq!(b.unwrap_err().kind(), ErrorKind::Unauthorized);

        assert_eq!(nav.pump(), Some("/login".to_string()));
        assert_eq!(nav.location(), "/login");
        assert_eq!(nav.pump(), None);
    }

    #[tokio::test]
    async fn redirect_is_suppressed_at_public_entry() {
        let expired = StubTransport::always(HttpResponse::json(401, &json!({})));
        let harness = Harness::logged_in(expired);
        let nav = Navigator::new(harness.context.clone(), &harness.events, "/login");

        let _ = harness.api.get("/auth/me").await;

        assert_eq!(nav.pump(), None);
        assert_eq!(nav.location(), "/login");
    }

    #[test]
    fn visit_applies_guard() {
        let harness = Harness::logged_in(StubTransport::unreachable("offline"));
        let nav = Navigator::new(harness.context.clone(), &harness.events, "/dashboard/guard");

        assert!(nav.visit("/attendance").is_allowed());
        assert_eq!(nav.location(), "/attendance");

        let denied = nav.visit("/dashboard/admin");
        assert_eq!(denied.redirect_path(), Some("/dashboard/guard"));
        assert_eq!(nav.location(), "/dashboard/guard");
    }

    #[test]
    fn logout_navigates_to_public_entry() {
        let harness = Harness::logged_in(StubTransport::unreachable("offline"));
        let nav = Navigator::new(harness.context.clone(), &harness.events, "/profile");

        harness.context.logout();

        assert_eq!(nav.pump(), Some("/login".to_string()));
        assert_eq!(nav.visit("/profile").redirect_path(), Some("/login"));
    }
}

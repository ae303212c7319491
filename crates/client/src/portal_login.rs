//! Role-gated login: authenticate through a portal, then confirm the identity
//! belongs there.

use std::sync::Arc;

use sgms_auth::Portal;
use sgms_core::{Identity, Role};

use crate::context::SessionContext;
use crate::error::ErrorKind;

/// What the login screen should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalOutcome {
    /// Identity matches the portal; navigate to its dashboard.
    Entered {
        portal: Portal,
        identity: Identity,
        redirect_to: String,
    },
    /// Login succeeded but through the wrong portal. The session stays
    /// authenticated; the screen shows `message` and stays put.
    RoleMismatch {
        message: String,
        actual_role: Role,
        actual_landing: String,
    },
    /// Login failed; `message` is the classified error text.
    Failed { message: String, kind: ErrorKind },
}

impl PortalOutcome {
    pub fn is_entered(&self) -> bool {
        matches!(self, PortalOutcome::Entered { .. })
    }

    /// Text for the login screen's error banner, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            PortalOutcome::Entered { .. } => None,
            PortalOutcome::RoleMismatch { message, .. } | PortalOutcome::Failed { message, .. } => {
                Some(message)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PortalLogin {
    context: Arc<SessionContext>,
}

impl PortalLogin {
    pub fn new(context: Arc<SessionContext>) -> Self {
        Self { context }
    }

    pub async fn submit(&self, portal: Portal, email: &str, password: &str) -> PortalOutcome {
        let identity = match self.context.login(email, password).await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::info!(%portal, kind = %err.kind(), "portal login failed");
                return PortalOutcome::Failed {
                    message: err.user_message().to_string(),
                    kind: err.kind(),
                };
            }
        };

        match portal.check(&identity) {
            Ok(()) => PortalOutcome::Entered {
                portal,
                redirect_to: portal.redirect_route().to_string(),
                identity,
            },
            Err(mismatch) => {
                tracing::warn!(
                    %portal,
                    actual_role = %mismatch.actual,
                    "identity entered through the wrong portal"
                );
                let actual_landing = self
                    .context
                    .policy()
                    .landing(mismatch.actual)
                    .unwrap_or_else(|| mismatch.correct_portal().redirect_route())
                    .to_string();

                PortalOutcome::RoleMismatch {
                    message: mismatch.to_string(),
                    actual_role: mismatch.actual,
                    actual_landing,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, StubTransport};
    use crate::transport::HttpResponse;
    use serde_json::json;

    fn login_as(role: &str) -> StubTransport {
        StubTransport::always(HttpResponse::json(
            200,
            &json!({
                "success": true,
                "data": {
                    "token": "t1",
                    "userId": 1,
                    "email": "a@x.com",
                    "fullName": "A",
                    "role": role
                }
            }),
        ))
    }

    #[tokio::test]
    async fn matching_portal_enters_its_dashboard() {
        let harness = Harness::anonymous(login_as("GUARD"));
        let login = PortalLogin::new(harness.context.clone());

        let outcome = login.submit(Portal::Guard, "a@x.com", "pw").await;

        match outcome {
            PortalOutcome::Entered { redirect_to, identity, .. } => {
                assert_eq!(redirect_to, "/dashboard/guard");
                assert_eq!(identity.role, Role::Guard);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrong_portal_keeps_the_session() {
        let harness = Harness::anonymous(login_as("GUARD"));
        let login = PortalLogin::new(harness.context.clone());

        let outcome = login.submit(Portal::Client, "a@x.com", "pw").await;

        assert_eq!(
            outcome,
            PortalOutcome::RoleMismatch {
                message: "This account does not belong to the Client Portal. \
                          Please use the Guard Portal."
                    .to_string(),
                actual_role: Role::Guard,
                actual_landing: "/dashboard/guard".to_string(),
            }
        );
        assert!(harness.context.is_authenticated());
        assert_eq!(harness.context.user_role(), Some(Role::Guard));
        assert!(!harness.context.authorize(&[Role::Client]).is_allowed());
        assert!(harness.context.authorize(&[Role::Guard]).is_allowed());
    }

    #[tokio::test]
    async fn failures_carry_the_classified_message() {
        let harness = Harness::anonymous(StubTransport::unreachable("connection refused"));
        let login = PortalLogin::new(harness.context.clone());

        let outcome = login.submit(Portal::Admin, "a@x.com", "pw").await;

        assert_eq!(outcome.error_message(), Some("connection refused"));
        assert!(matches!(
            outcome,
            PortalOutcome::Failed { kind: ErrorKind::NetworkError, .. }
        ));
        assert!(!harness.context.is_authenticated());
    }
}

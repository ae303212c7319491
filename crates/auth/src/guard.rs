//! Authorization guard for protected views.
//!
//! - No IO
//! - No panics
//! - Total: every (session, required roles) pair yields exactly one decision

use serde::Serialize;

use sgms_core::{Role, Session};

use crate::policy::RoutePolicy;

/// Why a view was not entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RedirectReason {
    /// No authenticated session (anonymous or not yet initialized).
    NotAuthenticated,
    /// Authenticated, but the role is outside the view's role set.
    RoleNotPermitted { role: Role },
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    RedirectTo { path: String, reason: RedirectReason },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::RedirectTo { path, .. } => Some(path),
        }
    }

    /// Human-readable reason, for logs.
    pub fn explain(&self) -> String {
        match self {
            Decision::Allow => "access granted".to_string(),
            Decision::RedirectTo {
                path,
                reason: RedirectReason::NotAuthenticated,
            } => format!("no authenticated session; redirecting to {path}"),
            Decision::RedirectTo {
                path,
                reason: RedirectReason::RoleNotPermitted { role },
            } => format!("role {role} may not enter this view; redirecting to {path}"),
        }
    }
}

/// Decide whether `session` may enter a view requiring one of `required`.
///
/// An empty `required` set admits any authenticated identity. An
/// authenticated user outside the set is sent to their own landing page.
pub fn decide(session: &Session, required: &[Role], policy: &RoutePolicy) -> Decision {
    let Some(identity) = session.identity() else {
        return Decision::RedirectTo {
            path: policy.public_entry().to_string(),
            reason: RedirectReason::NotAuthenticated,
        };
    };

    if required.is_empty() || required.contains(&identity.role) {
        return Decision::Allow;
    }

    let path = policy
        .landing(identity.role)
        .unwrap_or(policy.public_entry())
        .to_string();

    Decision::RedirectTo {
        path,
        reason: RedirectReason::RoleNotPermitted {
            role: identity.role,
        },
    }
}

/// Decide for a concrete path, using the policy's route declarations.
///
/// Paths without a declaration are public and always allowed.
pub fn decide_path(session: &Session, path: &str, policy: &RoutePolicy) -> Decision {
    match policy.route_for(path) {
        Some(route) => decide(session, &route.allowed, policy),
        None => Decision::Allow,
    }
}

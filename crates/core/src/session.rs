//! Session lifecycle.
//!
//! ```text
//! Uninitialized ─► Anonymous ─(login)─► Authenticated ─(logout / 401)─► Anonymous
//!        └───────► Authenticated
//! ```

use crate::{Credential, Identity, Role};

/// Lifecycle state of the process-wide session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Persistent storage has not been read yet. Gated views must not render.
    Uninitialized,
    Anonymous,
    Authenticated,
}

/// Credential and identity of a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub credential: Credential,
    pub identity: Identity,
}

impl AuthenticatedSession {
    pub fn new(credential: Credential, identity: Identity) -> Self {
        Self {
            credential,
            identity,
        }
    }
}

/// The session as seen by the rest of the application.
///
/// A credential without an identity (or the reverse) is not representable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Uninitialized,
    Anonymous,
    Authenticated(AuthenticatedSession),
}

impl Session {
    pub fn authenticated(credential: Credential, identity: Identity) -> Self {
        Session::Authenticated(AuthenticatedSession::new(credential, identity))
    }

    /// Build the post-initialization state from whatever storage produced.
    pub fn from_stored(stored: Option<AuthenticatedSession>) -> Self {
        match stored {
            Some(s) => Session::Authenticated(s),
            None => Session::Anonymous,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self {
            Session::Uninitialized => Lifecycle::Uninitialized,
            Session::Anonymous => Lifecycle::Anonymous,
            Session::Authenticated(_) => Lifecycle::Authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated(s) => Some(&s.identity),
            _ => None,
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Session::Authenticated(s) => Some(&s.credential),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|i| i.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserId;

    #[test]
    fn default_session_is_uninitialized() {
        let session = Session::default();
        assert_eq!(session.lifecycle(), Lifecycle::Uninitialized);
        assert!(session.identity().is_none());
        assert!(session.role().is_none());
    }

    #[test]
    fn from_stored_picks_lifecycle() {
        assert_eq!(Session::from_stored(None).lifecycle(), Lifecycle::Anonymous);

        let identity = Identity::new(UserId::new(3), "c@x.com", "C", Role::Client);
        let session = Session::from_stored(Some(AuthenticatedSession::new(
            Credential::new("tok").unwrap(),
            identity.clone(),
        )));

        assert_eq!(session.lifecycle(), Lifecycle::Authenticated);
        assert_eq!(session.identity(), Some(&identity));
        assert_eq!(session.role(), Some(Role::Client));
        assert_eq!(session.credential().map(|c| c.as_str()), Some("tok"));
    }
}

use serde::Serialize;

use sgms_core::{Role, UserId};

/// Something happened to the process-wide session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A login succeeded and the session was persisted.
    LoggedIn { user_id: UserId, role: Role },

    /// The user logged out; navigate to `redirect_to`.
    LoggedOut { redirect_to: String },

    /// The backend rejected the credential (HTTP 401) and the session was
    /// torn down. Subscribers already on `redirect_to` stay put.
    Terminated { redirect_to: String },
}

impl SessionEvent {
    pub fn logged_in(user_id: UserId, role: Role) -> Self {
        Self::LoggedIn { user_id, role }
    }

    pub fn logged_out(redirect_to: impl Into<String>) -> Self {
        Self::LoggedOut {
            redirect_to: redirect_to.into(),
        }
    }

    pub fn terminated(redirect_to: impl Into<String>) -> Self {
        Self::Terminated {
            redirect_to: redirect_to.into(),
        }
    }

    /// Hard navigation requested by this event, if any.
    pub fn redirect_to(&self) -> Option<&str> {
        match self {
            SessionEvent::LoggedIn { .. } => None,
            SessionEvent::LoggedOut { redirect_to } | SessionEvent::Terminated { redirect_to } => {
                Some(redirect_to)
            }
        }
    }
}

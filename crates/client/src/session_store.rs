//! Persistent session store: the credential and the identity, under fixed keys.
//!
//! Storage failures never escape this module. Losing persistence degrades to
//! "log in again", it does not crash the console.

use std::sync::Arc;

use sgms_core::{AuthenticatedSession, Credential, Identity};

use crate::storage::KeyValueBackend;

/// Key holding the raw bearer token.
pub const AUTH_TOKEN_KEY: &str = "sgms_token";

/// Key holding the JSON-serialized identity.
pub const USER_DATA_KEY: &str = "sgms_user_data";

#[derive(Clone)]
pub struct PersistentSessionStore {
    backend: Arc<dyn KeyValueBackend>,
}

impl core::fmt::Debug for PersistentSessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PersistentSessionStore").finish_non_exhaustive()
    }
}

impl PersistentSessionStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// Persist credential and identity together.
    ///
    /// Returns whether the write stuck. On partial failure both keys are
    /// removed again, so `load()` never sees one without the other.
    pub fn save(&self, credential: &Credential, identity: &Identity) -> bool {
        let user_data = match serde_json::to_string(identity) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize identity; session not persisted");
                return false;
            }
        };

        let entries = [
            (USER_DATA_KEY, user_data.as_str()),
            (AUTH_TOKEN_KEY, credential.as_str()),
        ];

        match self.backend.set_many(&entries) {
            Ok(()) => {
                tracing::debug!(user_id = %identity.user_id, "session persisted");
                true
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "failed to persist session; continuing without persistence"
                );
                self.clear();
                false
            }
        }
    }

    /// Read the stored session. `None` when either half is missing, the
    /// identity does not parse, or storage is unavailable.
    pub fn load(&self) -> Option<AuthenticatedSession> {
        let token = self.read(AUTH_TOKEN_KEY)?;
        let user_data = self.read(USER_DATA_KEY)?;

        let identity: Identity = match serde_json::from_str(&user_data) {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "stored identity is unreadable; treating session as absent"
                );
                return None;
            }
        };

        let credential = Credential::new(token).ok()?;
        Some(AuthenticatedSession::new(credential, identity))
    }

    /// Stored credential alone, for the `Authorization` header.
    pub fn credential(&self) -> Option<Credential> {
        self.read(AUTH_TOKEN_KEY)
            .and_then(|token| Credential::new(token).ok())
    }

    /// Remove both keys. Idempotent.
    pub fn clear(&self) {
        if let Err(err) = self.backend.remove_many(&[AUTH_TOKEN_KEY, USER_DATA_KEY]) {
            tracing::warn!(error = %err, "failed to clear stored session");
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "session storage read failed");
                None
            }
        }
    }
}

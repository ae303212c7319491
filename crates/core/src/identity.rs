//! Bearer credentials and the identity of the logged-in user.

use serde::{Deserialize, Serialize};

use crate::{CoreError, Role, UserId};

/// Opaque bearer token issued by the backend at login.
///
/// The client never inspects its structure or expiry; it is valid until the
/// backend answers 401.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Result<Self, CoreError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CoreError::validation("credential must not be empty"));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Tokens must never end up in logs.
impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Authenticated user's profile.
///
/// Immutable once issued: a role change requires a new login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Identity {
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        full_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            full_name: full_name.into(),
            role,
            phone: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_credential_is_rejected() {
        assert!(Credential::new("").is_err());
        assert!(Credential::new("   ").is_err());
        assert_eq!(Credential::new("t1").unwrap().bearer(), "Bearer t1");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = Credential::new("super-secret").unwrap();
        let shown = format!("{cred:?}");
        assert!(!shown.contains("super-secret"));
    }

    #[test]
    fn identity_uses_camel_case_layout() {
        let identity = Identity::new(UserId::new(1), "a@x.com", "A", Role::Guard);
        let json = serde_json::to_value(&identity).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "userId": 1,
                "email": "a@x.com",
                "fullName": "A",
                "role": "GUARD"
            })
        );

        let back: Identity = serde_json::from_value(json).unwrap();
        assert_eq!(back, identity);
    }

    #[test]
    fn identity_ignores_unknown_fields() {
        let identity: Identity = serde_json::from_str(
            r#"{"userId":7,"email":"m@x.com","fullName":"M","role":"manager","roles":["MANAGER"]}"#,
        )
        .unwrap();
        assert_eq!(identity.role, Role::Supervisor);
        assert_eq!(identity.user_id, UserId::new(7));
    }
}

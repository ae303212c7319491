//! Authentication service: login, logout, registration and the pure reads
//! over whatever the session store holds.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use sgms_core::{AuthenticatedSession, Credential, Identity, Role, UserId};
use sgms_events::{EventBus, SessionEvent};

use crate::config::endpoints;
use crate::error::{ApiError, ApiResult, INVALID_RESPONSE};
use crate::gateway::{ApiClient, SessionBus};
use crate::session_store::PersistentSessionStore;

/// Extra profile fields sent with a registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDetails {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    /// Defaults to CLIENT.
    pub role: Option<Role>,
}

/// Profile returned by `/auth/register` and `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserProfile {
    /// First recognized role, CLIENT when none is.
    pub fn primary_role(&self) -> Role {
        self.roles
            .first()
            .and_then(|r| Role::parse(r).ok())
            .unwrap_or(Role::Client)
    }
}

/// Login responses come in two shapes depending on the backend revision.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LoginPayload {
    #[serde(rename_all = "camelCase")]
    Nested {
        access_token: String,
        user: UserProfile,
    },
    #[serde(rename_all = "camelCase")]
    Flat {
        token: String,
        user_id: UserId,
        email: String,
        full_name: String,
        role: Role,
        #[serde(default)]
        phone: Option<String>,
    },
}

impl LoginPayload {
    fn into_session(self) -> Option<AuthenticatedSession> {
        let (token, identity) = match self {
            LoginPayload::Nested { access_token, user } => {
                let role = user.primary_role();
                let mut identity = Identity::new(
                    user.id,
                    user.email,
                    user.full_name.unwrap_or_default(),
                    role,
                );
                identity.phone = user.phone;
                (access_token, identity)
            }
            LoginPayload::Flat {
                token,
                user_id,
                email,
                full_name,
                role,
                phone,
            } => {
                let mut identity = Identity::new(user_id, email, full_name, role);
                identity.phone = phone;
                (token, identity)
            }
        };

        let credential = Credential::new(token).ok()?;
        Some(AuthenticatedSession::new(credential, identity))
    }
}

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    store: PersistentSessionStore,
    events: Arc<SessionBus>,
    public_entry: Arc<str>,
}

impl core::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthService")
            .field("api", &self.api)
            .field("public_entry", &self.public_entry)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        api: ApiClient,
        store: PersistentSessionStore,
        events: Arc<SessionBus>,
        public_entry: &str,
    ) -> Self {
        Self {
            api,
            store,
            events,
            public_entry: Arc::from(public_entry),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Exchange credentials for a session and persist it.
    ///
    /// `LoggedIn` is published only once the session is stored. Does not
    /// update the session context; use `SessionContext::login` from UI code.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Identity> {
        self.login_session(email, password)
            .await
            .map(|session| session.identity)
    }

    pub(crate) async fn login_session(
        &self,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthenticatedSession> {
        let payload = self
            .api
            .post(endpoints::LOGIN, &json!({ "email": email, "password": password }))
            .await?;

        let session = serde_json::from_value::<LoginPayload>(payload)
            .ok()
            .and_then(LoginPayload::into_session)
            .ok_or_else(|| {
                tracing::warn!("login response lacks a token or identity");
                ApiError::parse(INVALID_RESPONSE, None)
            })?;

        // Without durable storage the console stays anonymous.
        if !self.store.save(&session.credential, &session.identity) {
            tracing::warn!(
                user_id = %session.identity.user_id,
                "login accepted by backend but session could not be persisted"
            );
            return Ok(session);
        }

        tracing::info!(
            user_id = %session.identity.user_id,
            role = %session.identity.role,
            "login succeeded"
        );
        self.publish(SessionEvent::logged_in(
            session.identity.user_id,
            session.identity.role,
        ));

        Ok(session)
    }

    /// Local only: clears the store and asks for navigation to the public
    /// entry. The backend is not told.
    pub fn logout(&self) {
        self.store.clear();
        tracing::info!("logged out");
        self.publish(SessionEvent::logged_out(&*self.public_entry));
    }

    /// Create an account. Does not log in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        details: RegistrationDetails,
    ) -> ApiResult<UserProfile> {
        let role = details.role.unwrap_or(Role::Client);
        let body = json!({
            "email": email,
            "password": password,
            "fullName": details.full_name,
            "phone": details.phone,
            "role": role.as_str(),
        });

        self.api.post_as(endpoints::REGISTER, &body).await
    }

    /// Profile of the stored credential's owner, as the backend sees it now.
    pub async fn fetch_profile(&self) -> ApiResult<UserProfile> {
        self.api.get_as(endpoints::ME).await
    }

    pub fn stored_session(&self) -> Option<AuthenticatedSession> {
        self.store.load()
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.store.load().map(|s| s.identity)
    }

    /// True only when both the credential and a readable identity are stored.
    pub fn is_authenticated(&self) -> bool {
        self.store.load().is_some()
    }

    pub fn user_role(&self) -> Option<Role> {
        self.current_user().map(|identity| identity.role)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.user_role() == Some(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.user_role().is_some_and(|role| roles.contains(&role))
    }

    fn publish(&self, event: SessionEvent) {
        if let Err(err) = self.events.publish(event) {
            tracing::warn!(error = ?err, "failed to publish session event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::{Harness, StubTransport};
    use crate::transport::HttpResponse;

    fn flat_login() -> HttpResponse {
        HttpResponse::json(
            200,
            &json!({
                "success": true,
                "data": {
                    "token": "t1",
                    "userId": 1,
                    "email": "a@x.com",
                    "fullName": "A",
                    "role": "GUARD"
                }
            }),
        )
    }

    #[tokio::test]
    async fn login_persists_and_reports_identity() {
        let transport = StubTransport::always(flat_login());
        let harness = Harness::anonymous(transport.clone());
        let events = harness.events.subscribe();

        let identity = harness.auth().login("a@x.com", "pw").await.unwrap();

        assert_eq!(identity.role, Role::Guard);
        assert_eq!(identity.user_id, UserId::new(1));
        assert!(harness.auth().is_authenticated());
        assert_eq!(harness.auth().user_role(), Some(Role::Guard));
        assert_eq!(harness.store.credential().unwrap().as_str(), "t1");
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::logged_in(UserId::new(1), Role::Guard)
        );

        let sent = transport.last_request().unwrap();
        assert!(sent.url.ends_with("/auth/login"));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(sent.body.as_deref().unwrap()).unwrap(),
            json!({ "email": "a@x.com", "password": "pw" })
        );
    }

    #[tokio::test]
    async fn unpersisted_login_publishes_nothing() {
        let harness = Harness::with_backend(
            StubTransport::always(flat_login()),
            Arc::new(crate::storage::DisabledBackend),
        );
        let events = harness.events.subscribe();

        let identity = harness.auth().login("a@x.com", "pw").await.unwrap();

        assert_eq!(identity.role, Role::Guard);
        assert!(!harness.auth().is_authenticated());
        assert!(events.drain().is_empty());
    }

    #[tokio::test]
    async fn login_accepts_nested_shape() {
        let transport = StubTransport::always(HttpResponse::json(
            200,
            &json!({
                "accessToken": "t2",
                "tokenType": "Bearer",
                "expiresInSeconds": 3600,
                "user": {
                    "id": 4,
                    "email": "m@x.com",
                    "fullName": "M",
                    "phone": "555",
                    "roles": ["MANAGER", "GUARD"]
                }
            }),
        ));
        let harness = Harness::anonymous(transport);

        let identity = harness.auth().login("m@x.com", "pw").await.unwrap();

        assert_eq!(identity.role, Role::Supervisor);
        assert_eq!(identity.phone.as_deref(), Some("555"));
        assert_eq!(harness.store.credential().unwrap().as_str(), "t2");
    }

    #[tokio::test]
    async fn nested_shape_without_roles_defaults_to_client() {
        let transport = StubTransport::always(HttpResponse::json(
            200,
            &json!({ "accessToken": "t3", "user": { "id": 9, "email": "c@x.com", "roles": [] } }),
        ));
        let harness = Harness::anonymous(transport);

        let identity = harness.auth().login("c@x.com", "pw").await.unwrap();
        assert_eq!(identity.role, Role::Client);
    }

    #[tokio::test]
    async fn login_without_token_is_parse_error_and_stores_nothing() {
        let transport = StubTransport::always(HttpResponse::json(
            200,
            &json!({ "success": true, "data": { "userId": 1, "email": "a@x.com" } }),
        ));
        let harness = Harness::anonymous(transport);

        let err = harness.auth().login("a@x.com", "pw").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ParseError);
        assert_eq!(err.message(), "Invalid response from server");
        assert!(!harness.auth().is_authenticated());
    }

    #[tokio::test]
    async fn rejected_credentials_surface_the_classified_error() {
        let transport = StubTransport::always(HttpResponse::json(
            400,
            &json!({ "success": false, "message": "Invalid email or password" }),
        ));
        let harness = Harness::anonymous(transport);

        let err = harness.auth().login("a@x.com", "bad").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert_eq!(err.message(), "Invalid email or password");
        assert!(!harness.auth().is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_store_and_requests_redirect() {
        let harness = Harness::logged_in(StubTransport::unreachable("offline"));
        let events = harness.events.subscribe();

        harness.auth().logout();

        assert!(!harness.auth().is_authenticated());
        assert_eq!(harness.auth().current_user(), None);
        assert_eq!(events.try_recv().unwrap(), SessionEvent::logged_out("/login"));
    }

    #[test]
    fn role_reads_follow_the_store() {
        let harness = Harness::logged_in(StubTransport::unreachable("offline"));
        let auth = harness.auth();

        assert!(auth.has_role(Role::Guard));
        assert!(!auth.has_role(Role::Admin));
        assert!(auth.has_any_role(&[Role::Admin, Role::Guard]));
        assert!(!auth.has_any_role(&[]));

        harness.store.clear();
        assert_eq!(auth.user_role(), None);
        assert!(!auth.has_any_role(&Role::ALL));
    }

    #[tokio::test]
    async fn register_upper_cases_role_and_does_not_log_in() {
        let transport = StubTransport::always(HttpResponse::json(
            201,
            &json!({ "id": 12, "email": "n@x.com", "fullName": "N", "roles": ["CLIENT"] }),
        ));
        let harness = Harness::anonymous(transport.clone());

        let profile = harness
            .auth()
            .register(
                "n@x.com",
                "pw",
                RegistrationDetails {
                    full_name: Some("N".to_string()),
                    ..RegistrationDetails::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.id, UserId::new(12));
        assert_eq!(profile.primary_role(), Role::Client);
        assert!(!harness.auth().is_authenticated());

        let sent = transport.last_request().unwrap();
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["role"], "CLIENT");
        assert_eq!(body["fullName"], "N");
    }

    #[tokio::test]
    async fn fetch_profile_uses_stored_credential() {
        let transport = StubTransport::always(HttpResponse::json(
            200,
            &json!({ "data": { "id": 1, "email": "a@x.com", "roles": ["GUARD"] } }),
        ));
        let harness = Harness::logged_in(transport.clone());

        let profile = harness.auth().fetch_profile().await.unwrap();

        assert_eq!(profile.primary_role(), Role::Guard);
        let sent = transport.last_request().unwrap();
        assert!(sent.url.ends_with("/auth/me"));
        assert_eq!(sent.header("authorization"), Some("Bearer t1"));
    }
}

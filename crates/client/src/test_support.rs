//! Scripted transport and a fully wired client for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sgms_auth::RoutePolicy;
use sgms_core::{Credential, Identity, Role, UserId};

use crate::auth_service::AuthService;
use crate::context::{SessionCell, SessionContext};
use crate::gateway::{ApiClient, SessionBus};
use crate::session_store::PersistentSessionStore;
use crate::storage::{KeyValueBackend, MemoryBackend};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

pub const BASE_URL: &str = "http://backend.test/api";

type Reply = Result<HttpResponse, TransportError>;
type Responder = dyn Fn(&HttpRequest) -> Reply + Send + Sync;

/// Transport that answers from a closure and records every request.
#[derive(Clone)]
pub struct StubTransport {
    respond: Arc<Responder>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl StubTransport {
    pub fn new(
        respond: impl Fn(&HttpRequest) -> Reply + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Arc::new(respond),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn always(response: HttpResponse) -> Self {
        Self::new(move |_| Ok(response.clone()))
    }

    pub fn unreachable(reason: &str) -> Self {
        let reason = reason.to_string();
        Self::new(move |_| Err(TransportError(reason.clone())))
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = (self.respond)(&request);
        self.requests.lock().unwrap().push(request);
        // Let concurrently joined requests interleave.
        tokio::task::yield_now().await;
        response
    }
}

pub fn guard_identity() -> Identity {
    Identity::new(UserId::new(1), "a@x.com", "A", Role::Guard)
}

pub struct Harness {
    pub api: ApiClient,
    pub store: PersistentSessionStore,
    pub events: Arc<SessionBus>,
    pub context: Arc<SessionContext>,
}

impl Harness {
    pub fn anonymous(transport: StubTransport) -> Self {
        Self::with_backend(transport, Arc::new(MemoryBackend::new()))
    }

    /// Starts from whatever `backend` already holds.
    pub fn with_backend(transport: StubTransport, backend: Arc<dyn KeyValueBackend>) -> Self {
        Self::build(transport, PersistentSessionStore::new(backend))
    }

    /// Starts from a stored GUARD session with token `t1`.
    pub fn logged_in(transport: StubTransport) -> Self {
        let store = PersistentSessionStore::new(Arc::new(MemoryBackend::new()));
        assert!(store.save(&Credential::new("t1").unwrap(), &guard_identity()));
        Self::build(transport, store)
    }

    pub fn auth(&self) -> &AuthService {
        self.context.auth()
    }

    fn build(transport: StubTransport, store: PersistentSessionStore) -> Self {
        let events = Arc::new(SessionBus::new());
        let cell = SessionCell::new();
        let api = ApiClient::new(
            BASE_URL,
            "/login",
            Arc::new(transport),
            store.clone(),
            cell.terminator(),
            events.clone(),
        );
        let auth = AuthService::new(api.clone(), store.clone(), events.clone(), "/login");
        let context =
            SessionContext::initialize(cell, auth, Arc::new(RoutePolicy::standard())).unwrap();

        Self {
            api,
            store,
            events,
            context: Arc::new(context),
        }
    }
}

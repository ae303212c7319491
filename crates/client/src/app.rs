//! Process wiring.
//!
//! Construction order matters: the session cell exists before the gateway
//! (which needs its terminator), and the context is initialized last, once the
//! service it wraps is complete.

use std::sync::Arc;

use anyhow::Context as _;

use sgms_auth::RoutePolicy;

use crate::auth_service::AuthService;
use crate::config::ClientConfig;
use crate::context::{SessionCell, SessionContext};
use crate::gateway::{ApiClient, SessionBus};
use crate::portal_login::PortalLogin;
use crate::router::Navigator;
use crate::session_store::PersistentSessionStore;
use crate::storage::{FileBackend, KeyValueBackend};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Everything a console front end needs, wired once per process.
#[derive(Debug, Clone)]
pub struct Console {
    config: ClientConfig,
    events: Arc<SessionBus>,
    context: Arc<SessionContext>,
}

impl Console {
    /// File-backed session storage and the `reqwest` transport.
    pub fn bootstrap(config: ClientConfig) -> anyhow::Result<Self> {
        let path = match &config.session_file {
            Some(path) => path.clone(),
            None => FileBackend::default_path()
                .context("no data directory available; set SGMS_SESSION_FILE")?,
        };
        tracing::debug!(session_file = %path.display(), "using file session storage");

        Self::with_parts(
            config,
            Arc::new(FileBackend::new(path)),
            Arc::new(ReqwestTransport::new()),
        )
    }

    pub fn with_parts(
        config: ClientConfig,
        backend: Arc<dyn KeyValueBackend>,
        transport: Arc<dyn HttpTransport>,
    ) -> anyhow::Result<Self> {
        let store = PersistentSessionStore::new(backend);
        let events = Arc::new(SessionBus::new());
        let cell = SessionCell::new();

        let api = ApiClient::new(
            &config.api_base_url,
            &config.public_entry,
            transport,
            store.clone(),
            cell.terminator(),
            events.clone(),
        );
        let auth = AuthService::new(api, store, events.clone(), &config.public_entry);
        let policy = Arc::new(RoutePolicy::standard_with_entry(config.public_entry.clone()));

        let context = SessionContext::initialize(cell, auth, policy)
            .context("failed to initialize session context")?;

        tracing::info!(
            api_base_url = %config.api_base_url,
            lifecycle = ?context.lifecycle(),
            "console ready"
        );

        Ok(Self {
            config,
            events,
            context: Arc::new(context),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    pub fn api(&self) -> &ApiClient {
        self.context.auth().api()
    }

    pub fn auth(&self) -> &AuthService {
        self.context.auth()
    }

    pub fn events(&self) -> &Arc<SessionBus> {
        &self.events
    }

    pub fn portal_login(&self) -> PortalLogin {
        PortalLogin::new(self.context.clone())
    }

    pub fn navigator(&self, initial: impl Into<String>) -> Navigator {
        Navigator::new(self.context.clone(), &self.events, initial)
    }
}

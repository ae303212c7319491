//! `sgms-client` — backend access and session state for the staffing console.
//!
//! Layering, bottom up:
//!
//! - `storage` / `session_store`: durable credential + identity
//! - `transport` / `envelope`: bytes on the wire and the response wrapper
//! - `gateway`: the one HTTP client; classifies every failure
//! - `auth_service`: login, logout, registration, role reads
//! - `context`: the broadcast session value the UI reacts to
//! - `portal_login` / `router`: login screen flow and guarded navigation
//! - `app`: wiring for a whole process

pub mod app;
pub mod auth_service;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod portal_login;
pub mod router;
pub mod session_store;
pub mod storage;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use app::Console;
pub use auth_service::{AuthService, RegistrationDetails, UserProfile};
pub use config::{ClientConfig, ConfigError};
pub use context::{ContextError, SessionCell, SessionContext, SessionTerminator};
pub use envelope::Envelope;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use gateway::{ApiClient, SessionBus};
pub use portal_login::{PortalLogin, PortalOutcome};
pub use router::Navigator;
pub use session_store::{AUTH_TOKEN_KEY, PersistentSessionStore, USER_DATA_KEY};
pub use storage::{DisabledBackend, FileBackend, KeyValueBackend, MemoryBackend, StorageError};
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport, TransportError,
};

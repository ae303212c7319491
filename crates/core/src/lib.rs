//! `sgms-core` — identity and session primitives shared by every SGMS crate.
//!
//! This crate is pure data: no IO, no HTTP, no storage.

pub mod error;
pub mod id;
pub mod identity;
pub mod role;
pub mod session;

pub use error::CoreError;
pub use id::UserId;
pub use identity::{Credential, Identity};
pub use role::Role;
pub use session::{AuthenticatedSession, Lifecycle, Session};

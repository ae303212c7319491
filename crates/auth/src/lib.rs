//! `sgms-auth` — pure authorization boundary for the console.
//!
//! This crate is intentionally decoupled from HTTP and storage: it decides,
//! it never fetches.

pub mod guard;
pub mod policy;
pub mod portal;

pub use guard::{Decision, RedirectReason, decide, decide_path};
pub use policy::{PUBLIC_ENTRY, ProtectedRoute, RoutePolicy, RoutePolicyBuilder};
pub use portal::{Portal, RoleMismatch};

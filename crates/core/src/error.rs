//! Core error model.

use thiserror::Error;

/// Failure to build a core value from untrusted input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The role name is not one of ADMIN, SUPERVISOR (MANAGER), GUARD, CLIENT.
    #[error("unknown role: '{0}'")]
    UnknownRole(String),

    /// A value failed validation (e.g. empty credential).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn unknown_role(name: impl Into<String>) -> Self {
        Self::UnknownRole(name.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

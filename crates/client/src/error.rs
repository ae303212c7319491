//! Classified failures surfaced by the API gateway.
//!
//! Every error a view can receive from the backend carries exactly one
//! [`ErrorKind`]. Views decide presentation from the kind; nothing above the
//! gateway inspects raw HTTP responses.

use serde::Serialize;
use thiserror::Error;

/// Closed set of failure kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// 401: credential invalid or expired. The session is already gone.
    Unauthorized,
    /// 403: valid credential, insufficient role. The session survives.
    Forbidden,
    /// 5xx.
    ServerError,
    /// Response body is not the expected JSON envelope.
    ParseError,
    /// The request never reached the server.
    NetworkError,
    /// The server reported failure inside its envelope.
    ApiError,
    /// Any other non-2xx status.
    HttpError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::ServerError => "SERVER_ERROR",
            ErrorKind::ParseError => "PARSE_ERROR",
            ErrorKind::NetworkError => "NETWORK_ERROR",
            ErrorKind::ApiError => "API_ERROR",
            ErrorKind::HttpError => "HTTP_ERROR",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) const SESSION_EXPIRED: &str = "Session expired. Please login again.";
pub(crate) const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";
pub(crate) const SERVER_FAILURE: &str = "Server error occurred. Please try again later.";
pub(crate) const NETWORK_FAILURE: &str = "Network error occurred";
pub(crate) const INVALID_RESPONSE: &str = "Invalid response from server";
pub(crate) const UNEXPECTED_FORMAT: &str = "Unexpected response format";
pub(crate) const REQUEST_FAILED: &str = "Request failed";

/// A classified gateway failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    /// Backend-specific error code from the envelope (e.g. `VALIDATION_ERROR`).
    code: Option<String>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
            code: None,
        }
    }

    pub(crate) fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized, SESSION_EXPIRED, Some(401))
    }

    pub(crate) fn forbidden() -> Self {
        Self::new(ErrorKind::Forbidden, PERMISSION_DENIED, Some(403))
    }

    pub(crate) fn server(status: u16) -> Self {
        Self::new(ErrorKind::ServerError, SERVER_FAILURE, Some(status))
    }

    pub(crate) fn network(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            NETWORK_FAILURE.to_string()
        } else {
            message
        };
        Self::new(ErrorKind::NetworkError, message, None)
    }

    pub(crate) fn parse(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::new(ErrorKind::ParseError, message, status)
    }

    pub(crate) fn api(message: impl Into<String>, status: u16, code: Option<String>) -> Self {
        Self {
            code,
            ..Self::new(ErrorKind::ApiError, message, Some(status))
        }
    }

    pub(crate) fn http(status: u16, reason: &str) -> Self {
        let message = if reason.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {reason}")
        };
        Self::new(ErrorKind::HttpError, message, Some(status))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status when one was received (or reported by the envelope).
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Text to render for the user. Never empty.
    pub fn user_message(&self) -> &str {
        if self.message.trim().is_empty() {
            "An unexpected error occurred. Please try again."
        } else {
            &self.message
        }
    }

    /// Only an authentication failure ends the session; navigation has
    /// already happened by the time a caller sees it.
    pub fn terminates_session(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_use_wire_names() {
        assert_eq!(ErrorKind::ServerError.as_str(), "SERVER_ERROR");
        assert_eq!(
            serde_json::to_value(ErrorKind::NetworkError).unwrap(),
            serde_json::json!("NETWORK_ERROR")
        );
    }

    #[test]
    fn only_unauthorized_terminates() {
        assert!(ApiError::unauthorized().terminates_session());
        assert!(!ApiError::forbidden().terminates_session());
        assert!(!ApiError::server(503).terminates_session());
    }

    #[test]
    fn network_error_has_no_status_and_a_fallback_message() {
        let err = ApiError::network("");
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert_eq!(err.status(), None);
        assert_eq!(err.message(), NETWORK_FAILURE);
    }

    #[test]
    fn http_error_wording() {
        assert_eq!(ApiError::http(404, "Not Found").to_string(), "HTTP 404: Not Found");
        assert_eq!(ApiError::http(499, "").to_string(), "HTTP 499");
    }
}

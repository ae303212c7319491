//! Backend response envelope: `{ success, data, message, timestamp }`.
//!
//! Decoding is lenient. Error responses may omit `data` and carry
//! `message` / `error` / `status` instead; a field with an unexpected JSON type
//! is treated as absent rather than failing the whole response.

use chrono::{DateTime, Utc};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    pub success: Option<bool>,
    pub data: Option<Value>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub status: Option<u16>,
    pub timestamp: Option<String>,
    raw: Value,
}

impl Envelope {
    pub fn from_value(raw: Value) -> Self {
        let Value::Object(map) = &raw else {
            return Self {
                raw,
                ..Self::default()
            };
        };

        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        Self {
            success: map.get("success").and_then(Value::as_bool),
            data: map.get("data").cloned(),
            message: text("message"),
            error: text("error"),
            status: map.get("status").and_then(status_code),
            timestamp: text("timestamp"),
            raw,
        }
    }

    /// Server explicitly reported failure.
    pub fn is_failure(&self) -> bool {
        self.success == Some(false)
    }

    /// Best human-readable failure text the envelope offers.
    pub fn failure_message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
    }

    /// The payload callers see: `data` when present, otherwise the whole body.
    pub fn into_payload(self) -> Value {
        match self.data {
            Some(data) => data,
            None => self.raw,
        }
    }
}

fn status_code(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

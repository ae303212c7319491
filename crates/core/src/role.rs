use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Role of an authenticated identity.
///
/// The set is closed. `SUPERVISOR` is the backend's name for what the
/// console calls a manager; both spellings parse to [`Role::Supervisor`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Admin,
    Supervisor,
    Guard,
    Client,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Supervisor, Role::Guard, Role::Client];

    /// Canonical upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Supervisor => "SUPERVISOR",
            Role::Guard => "GUARD",
            Role::Client => "CLIENT",
        }
    }

    /// Parse a role name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "SUPERVISOR" | "MANAGER" => Ok(Role::Supervisor),
            "GUARD" => Ok(Role::Guard),
            "CLIENT" => Ok(Role::Client),
            _ => Err(CoreError::unknown_role(name)),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s)
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Role::parse(&raw).map_err(serde::de::Error::custom)
    }
}

//! Client configuration, read from the environment.

use std::path::PathBuf;

use thiserror::Error;

pub const API_BASE_URL_ENV: &str = "SGMS_API_BASE_URL";
pub const SESSION_FILE_ENV: &str = "SGMS_SESSION_FILE";
pub const PUBLIC_ENTRY_ENV: &str = "SGMS_PUBLIC_ENTRY";

pub const DEFAULT_API_BASE_URL: &str = "https://sgms-backend-production.up.railway.app/api";

/// Backend paths, relative to the API base URL.
pub mod endpoints {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const ME: &str = "/auth/me";
    pub const HEALTH: &str = "/health";
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API base URL {0:?}: expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    #[error("invalid public entry {0:?}: must start with '/'")]
    InvalidPublicEntry(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// `None` selects the default data-dir location.
    pub session_file: Option<PathBuf>,
    pub public_entry: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: None,
            public_entry: sgms_auth::PUBLIC_ENTRY.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables take
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let api_base_url = var(API_BASE_URL_ENV).unwrap_or_else(|| {
            tracing::debug!("{API_BASE_URL_ENV} not set; using {DEFAULT_API_BASE_URL}");
            defaults.api_base_url.clone()
        });

        let config = Self {
            api_base_url,
            session_file: var(SESSION_FILE_ENV).map(PathBuf::from),
            public_entry: var(PUBLIC_ENTRY_ENV).unwrap_or(defaults.public_entry),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        self.api_base_url = url.into();
        self.validate()?;
        Ok(self)
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.api_base_url.clone()));
        }
        if !self.public_entry.starts_with('/') {
            return Err(ConfigError::InvalidPublicEntry(self.public_entry.clone()));
        }
        Ok(())
    }
}

//! Configuration of the hosted auth/database backend.
//!
//! Both the server and the CLI talk to the same managed backend, so the
//! connection settings live here rather than in either binary.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default name of the table holding role-bearing profile rows.
pub const DEFAULT_PROFILES_TABLE: &str = "profiles";

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hosted service (e.g. `https://project.example.co`).
    pub url: String,

    /// Public API key sent as the `apikey` header on every call.
    #[serde(default)]
    pub anon_key: String,

    /// Table that stores one profile row per auth subject.
    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,

    /// Per-request timeout in seconds. `None` leaves requests unbounded.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_profiles_table() -> String {
    DEFAULT_PROFILES_TABLE.to_string()
}

impl BackendConfig {
    /// Creates a configuration for the given base URL and key.
    #[must_use]
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            profiles_table: default_profiles_table(),
            timeout_secs: None,
        }
    }

    /// Sets the profiles table name.
    #[must_use]
    pub fn with_profiles_table(mut self, table: impl Into<String>) -> Self {
        self.profiles_table = table.into();
        self
    }

    /// Sets a request timeout.
    #[must_use]
    pub const fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Returns the request timeout, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the URL is not an absolute http(s) URL,
    /// the profiles table name is empty or not a plain identifier, or the
    /// timeout is zero.
    pub fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.url)
            .map_err(|e| Error::Validation(format!("invalid backend url '{}': {e}", self.url)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Validation(format!(
                "backend url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if self.profiles_table.is_empty()
            || !self
                .profiles_table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(Error::Validation(format!(
                "invalid profiles table name '{}'",
                self.profiles_table
            )));
        }

        if self.timeout_secs == Some(0) {
            return Err(Error::Validation("backend timeout must be positive".to_string()));
        }

        Ok(())
    }
}

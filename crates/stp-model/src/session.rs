//! Session domain model.
//!
//! Sessions are issued and destroyed by the hosted auth provider; the portal
//! only ever reads them. A [`SessionContext`] is what a navigation carries
//! into the gate: the raw access token, if the caller presented one.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Subject identifier.
    pub user_id: Uuid,
    /// Email the subject signed in with.
    pub email: String,
    /// Bearer token issued by the auth provider.
    pub access_token: String,
    /// When the token stops being accepted, if the provider said.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a session without a known expiry.
    #[must_use]
    pub fn new(user_id: Uuid, email: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Sets the expiry time.
    #[must_use]
    pub const fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Checks whether the session has expired at the given instant.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Checks whether the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns the remaining lifetime at the given instant.
    ///
    /// `None` when the provider gave no expiry; zero once expired.
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|exp| (exp - now).to_std().unwrap_or(Duration::ZERO))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Per-navigation input to the access gate.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    access_token: Option<String>,
    path: Option<String>,
}

impl SessionContext {
    /// A context with no credentials.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            access_token: None,
            path: None,
        }
    }

    /// A context carrying the given bearer token.
    ///
    /// Blank tokens are treated as absent.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        Self {
            access_token: (!token.is_empty()).then(|| token.to_string()),
            path: None,
        }
    }

    /// Records the path being navigated to.
    #[must_use]
    pub fn at_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns the bearer token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Returns the path being navigated to, if recorded.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Checks whether the caller presented any credentials.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.access_token.is_none()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("path", &self.path)
            .finish()
    }
}

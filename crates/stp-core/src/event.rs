//! Access events for audit logging.
//!
//! Every terminal decision of the access gate produces one event. Events
//! carry who asked (when known), what was decided and where the caller was
//! sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Protected content was rendered.
    AccessGranted,
    /// Caller was authenticated but sent to their landing area.
    AccessForbidden,
    /// Caller had no usable session or profile and was sent to login.
    LoginRequired,
    /// Caller signed in through the login entry point.
    SignIn,
    /// Sign-in attempt was rejected.
    SignInError,
    /// Caller signed out.
    SignOut,
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// An access event for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessEvent {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Subject identifier of the caller, if a session was resolved.
    pub user_id: Option<Uuid>,

    /// Email of the caller, if known.
    pub email: Option<String>,

    /// Role label of the caller, if a profile was resolved.
    pub role: Option<String>,

    /// Path the caller asked for.
    pub path: Option<String>,

    /// Path the caller was redirected to.
    pub redirect: Option<String>,

    /// Failure detail (never shown to the caller).
    pub error: Option<String>,
}

impl AccessEvent {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> AccessEventBuilder {
        AccessEventBuilder::new(event_type)
    }
}

/// Builder for access events.
#[derive(Debug)]
pub struct AccessEventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    user_id: Option<Uuid>,
    email: Option<String>,
    role: Option<String>,
    path: Option<String>,
    redirect: Option<String>,
    error: Option<String>,
}

impl AccessEventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            user_id: None,
            email: None,
            role: None,
            path: None,
            redirect: None,
            error: None,
        }
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the user ID.
    #[must_use]
    pub const fn user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Sets the email.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the role label.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sets the requested path.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the redirect target.
    #[must_use]
    pub fn redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> AccessEvent {
        AccessEvent {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            user_id: self.user_id,
            email: self.email,
            role: self.role,
            path: self.path,
            redirect: self.redirect,
            error: self.error,
        }
    }
}

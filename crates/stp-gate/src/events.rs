//! Access event logging for the gate.
//!
//! Every terminal decision produces one [`AccessEvent`]. The server logs
//! through [`TracingEventLogger`]; tests inspect [`InMemoryEventLogger`].

use parking_lot::RwLock;
use stp_core::event::{AccessEvent, AccessEventBuilder, EventType};
use stp_model::{Profile, Session};

use crate::decision::AccessState;

/// Sink for access events.
///
/// Logging never fails the navigation, so `log` has no error channel.
pub trait AccessEventLogger: Send + Sync {
    /// Records an event.
    fn log(&self, event: AccessEvent);
}

/// In-memory event logger for testing.
#[derive(Debug, Default)]
pub struct InMemoryEventLogger {
    events: RwLock<Vec<AccessEvent>>,
}

impl InMemoryEventLogger {
    /// Creates a new in-memory logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all logged events.
    #[must_use]
    pub fn events(&self) -> Vec<AccessEvent> {
        self.events.read().clone()
    }

    /// Returns logged events of one type.
    #[must_use]
    pub fn events_of(&self, event_type: EventType) -> Vec<AccessEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Clears all logged events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl AccessEventLogger for InMemoryEventLogger {
    fn log(&self, event: AccessEvent) {
        self.events.write().push(event);
    }
}

/// Event logger that writes to the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventLogger;

impl TracingEventLogger {
    /// Creates a new tracing logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AccessEventLogger for TracingEventLogger {
    fn log(&self, event: AccessEvent) {
        tracing::info!(
            event_id = %event.id,
            event_type = ?event.event_type,
            outcome = ?event.outcome,
            user_id = ?event.user_id,
            role = ?event.role,
            path = ?event.path,
            redirect = ?event.redirect,
            error = ?event.error,
            "access_event"
        );
    }
}

/// Builds the event for a terminal gate decision.
///
/// `error` carries the provider failure that forced a fail-closed outcome.
pub(crate) fn decision_event(
    state: AccessState,
    session: Option<&Session>,
    profile: Option<&Profile>,
    path: Option<&str>,
    error: Option<&str>,
) -> AccessEvent {
    let event_type = match state {
        AccessState::Authorized => EventType::AccessGranted,
        AccessState::Forbidden { .. } => EventType::AccessForbidden,
        AccessState::Loading | AccessState::Unauthenticated => EventType::LoginRequired,
    };

    let mut builder = AccessEventBuilder::new(event_type);
    if let Some(session) = session {
        builder = builder.user(session.user_id).email(session.email.clone());
    }
    if let Some(profile) = profile {
        builder = builder.role(profile.role.as_str());
    }
    if let Some(path) = path {
        builder = builder.path(path);
    }
    if let Some(redirect) = state.redirect_target() {
        builder = builder.redirect(redirect);
    }
    if let Some(error) = error {
        builder = builder.failure(error);
    }
    builder.build()
}

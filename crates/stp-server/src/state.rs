//! Application state management.
//!
//! This module defines the shared state that is passed to all request handlers.

use std::sync::Arc;

use stp_gate::{AccessEventLogger, AccessGate, TracingEventLogger};
use stp_session::{
    HostedBackend, MemoryDirectory, MemoryProfileStore, MemorySessionProvider, SignInProvider,
};

use crate::config::{BackendMode, ServerConfig};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,

    /// The access gate.
    pub gate: AccessGate,

    /// Sign-in provider used by the login entry point.
    pub sign_in: Arc<dyn SignInProvider>,

    /// Sink for access and sign-in events.
    pub events: Arc<dyn AccessEventLogger>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        config: ServerConfig,
        gate: AccessGate,
        sign_in: Arc<dyn SignInProvider>,
        events: Arc<dyn AccessEventLogger>,
    ) -> Self {
        Self {
            config,
            gate,
            sign_in,
            events,
        }
    }

    /// Builds the providers selected by the configuration.
    pub fn from_config(config: ServerConfig) -> anyhow::Result<Self> {
        Self::with_event_logger(config, Arc::new(TracingEventLogger::new()))
    }

    /// Builds the providers selected by the configuration, logging events
    /// to `events`.
    pub fn with_event_logger(
        config: ServerConfig,
        events: Arc<dyn AccessEventLogger>,
    ) -> anyhow::Result<Self> {
        match config.backend {
            BackendMode::Hosted => {
                let backend_config = config.backend_config.clone().ok_or_else(|| {
                    anyhow::anyhow!("hosted backend mode requires a backend configuration")
                })?;
                let backend = Arc::new(HostedBackend::new(backend_config)?);
                tracing::info!(url = %backend.config().base_url(), "Using hosted backend");

                let gate = AccessGate::new(backend.clone(), backend.clone())
                    .with_event_logger(events.clone());
                Ok(Self::new(config, gate, backend, events))
            }
            BackendMode::Memory => {
                let sessions = Arc::new(MemorySessionProvider::new());
                let profiles = Arc::new(MemoryProfileStore::new());
                let directory = MemoryDirectory::new(sessions.clone(), profiles.clone())
                    .with_session_ttl(config.session_ttl);

                for user in &config.memory_users {
                    directory.register(&user.email, &user.password, user.role.clone());
                }
                tracing::info!(
                    accounts = config.memory_users.len(),
                    "Using in-memory backend"
                );

                let gate = AccessGate::new(sessions, profiles).with_event_logger(events.clone());
                Ok(Self::new(config, gate, Arc::new(directory), events))
            }
        }
    }

    /// Returns the server configuration.
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }
}

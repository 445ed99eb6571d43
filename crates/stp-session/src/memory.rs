//! In-memory providers.
//!
//! Used by tests and by the server's `memory` backend mode. Passwords are
//! held in clear text; nothing here is meant to face real users.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use parking_lot::RwLock;
use rand::distr::{Alphanumeric, SampleString};
use stp_model::{Profile, Role, Session, SessionContext};
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};
use crate::provider::{ProfileStore, SessionProvider, SignInProvider};

/// Length of issued access tokens.
const TOKEN_LENGTH: usize = 40;

fn unavailable() -> SessionError {
    SessionError::Network("in-memory backend marked unavailable".to_string())
}

/// Session provider backed by a token map.
#[derive(Debug, Default)]
pub struct MemorySessionProvider {
    sessions: RwLock<HashMap<String, Session>>,
    unavailable: AtomicBool,
}

impl MemorySessionProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session under its access token.
    ///
    /// Expired sessions are dropped on the way.
    pub fn insert(&self, session: Session) {
        let mut sessions = self.sessions.write();
        sessions.retain(|_, existing| !existing.is_expired());
        sessions.insert(session.access_token.clone(), session);
    }

    /// Drops every expired session, returning how many were removed.
    pub fn prune_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        before - sessions.len()
    }

    /// Removes the session for a token, returning it if present.
    pub fn revoke(&self, access_token: &str) -> Option<Session> {
        self.sessions.write().remove(access_token)
    }

    /// Number of registered sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether no sessions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Makes every lookup fail with a network error until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionProvider for MemorySessionProvider {
    async fn current_session(&self, ctx: &SessionContext) -> SessionResult<Option<Session>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let Some(token) = ctx.access_token() else {
            return Ok(None);
        };

        let session = self.sessions.read().get(token).cloned();
        match session {
            Some(session) if session.is_expired() => {
                self.sessions.write().remove(token);
                Ok(None)
            }
            session => Ok(session),
        }
    }
}

/// Profile store backed by a map keyed by subject.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    unavailable: AtomicBool,
}

impl MemoryProfileStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a profile.
    pub fn upsert(&self, profile: Profile) {
        self.profiles.write().insert(profile.user_id, profile);
    }

    /// Removes a profile.
    pub fn remove(&self, user_id: Uuid) -> Option<Profile> {
        self.profiles.write().remove(&user_id)
    }

    /// Makes every lookup fail with a network error until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn profile_by_user_id(&self, user_id: Uuid) -> SessionResult<Option<Profile>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.profiles.read().get(&user_id).cloned())
    }
}

#[derive(Debug, Clone)]
struct Account {
    user_id: Uuid,
    password: String,
}

/// Credential table that issues sessions into a [`MemorySessionProvider`].
#[derive(Debug)]
pub struct MemoryDirectory {
    accounts: RwLock<HashMap<String, Account>>,
    sessions: Arc<MemorySessionProvider>,
    profiles: Arc<MemoryProfileStore>,
    session_ttl: Option<Duration>,
}

impl MemoryDirectory {
    /// Creates a directory issuing sessions into `sessions` and provisioning
    /// profiles into `profiles`.
    #[must_use]
    pub fn new(
        sessions: Arc<MemorySessionProvider>,
        profiles: Arc<MemoryProfileStore>,
    ) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            sessions,
            profiles,
            session_ttl: None,
        }
    }

    /// Sets the lifetime of issued sessions.
    #[must_use]
    pub const fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    /// Registers an account and provisions its profile.
    ///
    /// Re-registering an email replaces the password and role but keeps the
    /// subject identifier.
    pub fn register(&self, email: &str, password: &str, role: impl Into<Role>) -> Profile {
        let mut accounts = self.accounts.write();
        let user_id = accounts
            .get(email)
            .map_or_else(Uuid::now_v7, |existing| existing.user_id);

        accounts.insert(
            email.to_string(),
            Account {
                user_id,
                password: password.to_string(),
            },
        );

        let profile = Profile::new(user_id, role, email);
        self.profiles.upsert(profile.clone());
        profile
    }

    /// Registers an account with no profile row.
    pub fn register_without_profile(&self, email: &str, password: &str) -> Uuid {
        let user_id = Uuid::now_v7();
        self.accounts.write().insert(
            email.to_string(),
            Account {
                user_id,
                password: password.to_string(),
            },
        );
        user_id
    }

    /// Returns the session provider sessions are issued into.
    #[must_use]
    pub const fn sessions(&self) -> &Arc<MemorySessionProvider> {
        &self.sessions
    }

    /// Returns the profile store profiles are provisioned into.
    #[must_use]
    pub const fn profiles(&self) -> &Arc<MemoryProfileStore> {
        &self.profiles
    }
}

#[async_trait]
impl SignInProvider for MemoryDirectory {
    async fn sign_in(&self, email: &str, password: &str) -> SessionResult<Session> {
        let account = self
            .accounts
            .read()
            .get(email)
            .filter(|account| account.password == password)
            .cloned()
            .ok_or(SessionError::InvalidCredentials)?;

        let token = Alphanumeric.sample_string(&mut rand::rng(), TOKEN_LENGTH);
        let mut session = Session::new(account.user_id, email, token);
        if let Some(ttl) = self.session_ttl {
            // A lifetime past the representable calendar never expires.
            match TimeDelta::from_std(ttl)
                .ok()
                .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            {
                Some(expires_at) => session = session.with_expiry(expires_at),
                None => tracing::warn!(?ttl, "Session lifetime out of range; issuing without expiry"),
            }
        }

        self.sessions.insert(session.clone());
        tracing::debug!(user_id = %account.user_id, "Issued in-memory session");
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> SessionResult<()> {
        self.sessions.revoke(access_token);
        Ok(())
    }
}

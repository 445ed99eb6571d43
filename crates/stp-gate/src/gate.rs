//! Session and profile resolution around [`decide`].
//!
//! The gate performs two sequential reads per navigation: the session
//! first, then the profile for its subject. Any failure in either read
//! fails closed to [`AccessState::Unauthenticated`].

use std::sync::Arc;

use stp_model::{Profile, Session, SessionContext};
use stp_session::{ProfileStore, SessionError, SessionProvider};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::decision::{decide, home_path, AccessState};
use crate::events::{decision_event, AccessEventLogger, TracingEventLogger};
use crate::requirement::RoleRequirement;

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Terminal state.
    pub state: AccessState,
    /// Session the decision was made with.
    pub session: Option<Session>,
    /// Profile the decision was made with.
    pub profile: Option<Profile>,
}

/// How a navigation's resolution task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The terminal state was published to the navigation.
    Published(AccessState),
    /// The navigation was torn down first; nothing was published.
    Suppressed,
}

#[derive(Debug, Default)]
struct Lookup {
    session: Option<Session>,
    profile: Option<Profile>,
    error: Option<SessionError>,
}

impl Lookup {
    fn failed(session: Option<Session>, error: SessionError) -> Self {
        Self {
            session,
            profile: None,
            error: Some(error),
        }
    }
}

/// The access gate.
///
/// Cheap to clone; providers are shared.
#[derive(Clone)]
pub struct AccessGate {
    sessions: Arc<dyn SessionProvider>,
    profiles: Arc<dyn ProfileStore>,
    events: Arc<dyn AccessEventLogger>,
}

impl AccessGate {
    /// Creates a gate reading from the given providers.
    ///
    /// Decisions are logged through [`TracingEventLogger`] until another
    /// logger is installed.
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            sessions,
            profiles,
            events: Arc::new(TracingEventLogger::new()),
        }
    }

    /// Replaces the access event logger.
    #[must_use]
    pub fn with_event_logger(mut self, events: Arc<dyn AccessEventLogger>) -> Self {
        self.events = events;
        self
    }

    /// Reads the session, then the profile for its subject.
    ///
    /// Every read that ends without a usable session and profile records why
    /// in `error`, except an anonymous caller, who presented nothing.
    async fn lookup(&self, ctx: &SessionContext) -> Lookup {
        let session = match self.sessions.current_session(ctx).await {
            Ok(Some(session)) if session.is_expired() => {
                tracing::debug!(user_id = %session.user_id, "Session expired");
                return Lookup::failed(None, SessionError::Expired);
            }
            Ok(Some(session)) => session,
            Ok(None) if ctx.is_anonymous() => return Lookup::default(),
            Ok(None) => {
                tracing::debug!("Access token did not resolve to a session");
                return Lookup::failed(None, SessionError::NoSession);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed, denying access");
                return Lookup::failed(None, e);
            }
        };

        match self.profiles.profile_for_session(&session).await {
            Ok(Some(profile)) => Lookup {
                session: Some(session),
                profile: Some(profile),
                error: None,
            },
            Ok(None) => {
                tracing::debug!(user_id = %session.user_id, "No profile for session subject");
                let user_id = session.user_id;
                Lookup::failed(Some(session), SessionError::NoProfile(user_id))
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %session.user_id,
                    error = %e,
                    "Profile lookup failed, denying access"
                );
                Lookup::failed(Some(session), e)
            }
        }
    }

    /// Resolves the caller and decides access to a region.
    ///
    /// Never fails: provider errors resolve to `Unauthenticated`.
    pub async fn resolve(&self, ctx: &SessionContext, requirement: &RoleRequirement) -> Resolution {
        let lookup = self.lookup(ctx).await;
        let state = decide(lookup.session.as_ref(), lookup.profile.as_ref(), requirement);

        let error = lookup.error.as_ref().map(ToString::to_string);
        self.events.log(decision_event(
            state,
            lookup.session.as_ref(),
            lookup.profile.as_ref(),
            ctx.path(),
            error.as_deref(),
        ));

        Resolution {
            state,
            session: lookup.session,
            profile: lookup.profile,
        }
    }

    /// Starts a navigation.
    ///
    /// The returned [`Navigation`] reports `Loading` until the resolution
    /// task publishes its terminal state. Must be called within a tokio
    /// runtime.
    #[must_use]
    pub fn navigate(&self, ctx: SessionContext, requirement: RoleRequirement) -> Navigation {
        let (tx, rx) = watch::channel(AccessState::Loading);
        let gate = self.clone();

        let task = tokio::spawn(async move {
            tokio::select! {
                resolution = gate.resolve(&ctx, &requirement) => {
                    if tx.is_closed() {
                        return Settlement::Suppressed;
                    }
                    match tx.send(resolution.state) {
                        Ok(()) => Settlement::Published(resolution.state),
                        Err(_) => Settlement::Suppressed,
                    }
                }
                () = tx.closed() => {
                    tracing::debug!("Navigation torn down before resolution");
                    Settlement::Suppressed
                }
            }
        });

        Navigation { state: rx, task }
    }

    /// Where the site root sends the caller.
    ///
    /// `Unauthenticated` for callers without a usable session and profile;
    /// otherwise `Forbidden` carrying the caller's home area.
    pub async fn landing_for(&self, ctx: &SessionContext) -> AccessState {
        let lookup = self.lookup(ctx).await;
        match (lookup.session, lookup.profile) {
            (Some(session), Some(profile)) if session.user_id == profile.user_id => {
                AccessState::Forbidden {
                    redirect: home_path(&profile),
                }
            }
            _ => AccessState::Unauthenticated,
        }
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}

/// One resolution instance of the gate.
///
/// Dropping the navigation, or calling [`Navigation::teardown`], stops any
/// pending reads and suppresses a late result.
#[derive(Debug)]
pub struct Navigation {
    state: watch::Receiver<AccessState>,
    task: JoinHandle<Settlement>,
}

impl Navigation {
    /// Current state; `Loading` until resolution completes.
    #[must_use]
    pub fn state(&self) -> AccessState {
        *self.state.borrow()
    }

    /// Waits for the terminal state.
    ///
    /// A resolution task that died without publishing counts as
    /// `Unauthenticated`.
    pub async fn settled(&mut self) -> AccessState {
        match self.state.wait_for(AccessState::is_terminal).await {
            Ok(state) => *state,
            Err(_) => AccessState::Unauthenticated,
        }
    }

    /// Tears the navigation down, returning the resolution task.
    pub fn teardown(self) -> JoinHandle<Settlement> {
        drop(self.state);
        self.task
    }
}

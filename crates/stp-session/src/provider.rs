//! Provider traits read by the access gate.

use async_trait::async_trait;
use stp_model::{Profile, Session, SessionContext};
use uuid::Uuid;

use crate::error::SessionResult;

/// Resolves the caller's current session.
///
/// Implementations must not create sessions; an unknown, revoked or
/// malformed token resolves to `Ok(None)`.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Returns the session for the given context, if any.
    async fn current_session(&self, ctx: &SessionContext) -> SessionResult<Option<Session>>;
}

/// Read access to profile records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Gets the profile for a subject identifier.
    async fn profile_by_user_id(&self, user_id: Uuid) -> SessionResult<Option<Profile>>;

    /// Gets the profile of a session's subject, reading as that session.
    ///
    /// Stores that enforce per-caller visibility override this to present
    /// the caller's credentials. The default reads by subject identifier.
    async fn profile_for_session(&self, session: &Session) -> SessionResult<Option<Profile>> {
        self.profile_by_user_id(session.user_id).await
    }
}

/// Exchanges credentials for sessions at the login entry point.
#[async_trait]
pub trait SignInProvider: Send + Sync {
    /// Signs in with email and password.
    ///
    /// ## Errors
    ///
    /// Returns `SessionError::InvalidCredentials` if the provider rejects
    /// the credentials.
    async fn sign_in(&self, email: &str, password: &str) -> SessionResult<Session>;

    /// Revokes the session identified by the access token.
    async fn sign_out(&self, access_token: &str) -> SessionResult<()>;
}

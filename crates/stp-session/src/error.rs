//! Session error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while resolving sessions and profiles.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session could be resolved for the caller.
    #[error("No session")]
    NoSession,

    /// Session resolved but no profile exists for its subject.
    #[error("No profile for subject: {0}")]
    NoProfile(Uuid),

    /// Session was resolved but has already expired.
    #[error("Session expired")]
    Expired,

    /// Sign-in rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Transport failure talking to the backend.
    #[error("Network failure: {0}")]
    Network(String),

    /// Backend answered with an unexpected status.
    #[error("Backend error: {status} - {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Backend answered with a body we could not use.
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

impl SessionError {
    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSession | Self::NoProfile(_) | Self::Expired)
    }

    /// Checks if this is a transport error.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Backend {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(SessionError::NoSession.is_not_found());
        assert!(SessionError::NoProfile(Uuid::nil()).is_not_found());
        assert!(SessionError::Expired.is_not_found());
        assert!(!SessionError::Network("down".into()).is_not_found());
    }

    #[test]
    fn network_classification() {
        assert!(SessionError::Network("reset".into()).is_network());
        assert!(!SessionError::InvalidCredentials.is_network());
    }

    #[test]
    fn credentials_message_is_generic() {
        assert_eq!(SessionError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}

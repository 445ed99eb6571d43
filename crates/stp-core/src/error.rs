//! Error handling for the STP portal.
//!
//! Session and profile failures have their own error type in `stp-session`;
//! this one covers settings that cannot be used as given.

use thiserror::Error;

/// Result type alias using the portal error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for portal operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The environment cannot provide what the settings ask for.
    #[error("configuration error: {0}")]
    Config(String),

    /// A setting has a malformed value.
    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns whether this error stems from a value the caller supplied.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

//! HTTP-facing error types.
//!
//! Gate decisions never surface here; they always end in a redirect. These
//! errors cover the few requests that can genuinely fail, such as rendering
//! a page or reaching the backend during sign-in.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use stp_session::SessionError;
use thiserror::Error;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid request data.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Session backend failure.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Page rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(err) => match err {
                SessionError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                SessionError::NoSession | SessionError::NoProfile(_) | SessionError::Expired => {
                    StatusCode::UNAUTHORIZED
                }
                SessionError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
                SessionError::Backend { .. } | SessionError::InvalidResponse(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Template(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Session(SessionError::InvalidCredentials) => "invalid_credentials",
            Self::Session(SessionError::Network(_)) => "backend_unavailable",
            Self::Session(_) => "session_error",
            Self::Template(_) => "template_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Message safe to show to the caller.
    ///
    /// Backend detail stays in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Session(SessionError::InvalidCredentials) => {
                "Invalid email or password".to_string()
            }
            Self::Session(SessionError::Network(_)) => {
                "Sign-in is temporarily unavailable".to_string()
            }
            Self::Session(_) => "The authentication service returned an error".to_string(),
            Self::Template(_) | Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error: String,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.public_message()),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for request handlers.
pub type ServerResult<T> = Result<T, ServerError>;

//! REST client for the hosted auth/database service.
//!
//! The portal delegates identity and storage to a managed backend exposing
//! an auth API under `/auth/v1` and a table API under `/rest/v1`. Every call
//! carries the project's `apikey` header.
//!
//! | operation | request |
//! |-----------|---------|
//! | current session | `GET /auth/v1/user` with the caller's bearer token |
//! | profile lookup | `GET /rest/v1/{table}?id=eq.{id}&select=role,email` |
//! | sign in | `POST /auth/v1/token?grant_type=password` |
//! | sign out | `POST /auth/v1/logout` with the caller's bearer token |
//!
//! There is no retry policy. A request timeout applies only when one is
//! configured.

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use stp_core::BackendConfig;
use stp_model::{Profile, Role, Session, SessionContext};
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};
use crate::provider::{ProfileStore, SessionProvider, SignInProvider};

/// User object returned by the auth API.
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

/// Token grant response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: AuthUser,
}

/// Password grant request body.
#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

/// Profile row as selected from the profiles table.
#[derive(Debug, Deserialize)]
struct ProfileRow {
    role: Role,
    #[serde(default)]
    email: Option<String>,
}

/// Client for the hosted backend.
#[derive(Debug, Clone)]
pub struct HostedBackend {
    client: Client,
    config: BackendConfig,
}

impl HostedBackend {
    /// Creates a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `stp_core::Error::Validation` if the configuration is invalid
    /// and `stp_core::Error::Config` if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> stp_core::Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| stp_core::Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Returns the backend configuration.
    #[must_use]
    pub const fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    fn with_api_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.config.anon_key)
    }
}

/// Decodes a successful response, mapping other statuses to `Backend`.
async fn handle_response<T: DeserializeOwned>(response: Response) -> SessionResult<T> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| SessionError::InvalidResponse(e.to_string()))
    } else {
        Err(backend_error(response).await)
    }
}

async fn backend_error(response: Response) -> SessionError {
    let status = response.status();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    SessionError::Backend {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl SessionProvider for HostedBackend {
    async fn current_session(&self, ctx: &SessionContext) -> SessionResult<Option<Session>> {
        let Some(token) = ctx.access_token() else {
            return Ok(None);
        };

        let response = self
            .with_api_key(self.client.get(self.url("/auth/v1/user")))
            .bearer_auth(token)
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::debug!(status = %response.status(), "Auth API rejected access token");
            return Ok(None);
        }

        let user: AuthUser = handle_response(response).await?;
        Ok(Some(Session::new(
            user.id,
            user.email.unwrap_or_default(),
            token,
        )))
    }
}

#[async_trait]
impl ProfileStore for HostedBackend {
    async fn profile_by_user_id(&self, user_id: Uuid) -> SessionResult<Option<Profile>> {
        self.read_profile(user_id, &self.config.anon_key).await
    }

    async fn profile_for_session(&self, session: &Session) -> SessionResult<Option<Profile>> {
        self.read_profile(session.user_id, &session.access_token).await
    }
}

impl HostedBackend {
    /// Reads the profile row for `user_id`, authorized as `bearer`.
    ///
    /// Row-level security on the table sees the bearer's identity, so a
    /// caller's own token reveals their own row.
    async fn read_profile(&self, user_id: Uuid, bearer: &str) -> SessionResult<Option<Profile>> {
        let path = format!("/rest/v1/{}", self.config.profiles_table);
        let id_filter = format!("eq.{user_id}");

        let response = self
            .with_api_key(self.client.get(self.url(&path)))
            .bearer_auth(bearer)
            .query(&[("id", id_filter.as_str()), ("select", "role,email")])
            .send()
            .await?;

        let mut rows: Vec<ProfileRow> = handle_response(response).await?;
        match rows.len() {
            0 => Ok(None),
            1 => {
                let row = rows.remove(0);
                Ok(Some(Profile::new(
                    user_id,
                    row.role,
                    row.email.unwrap_or_default(),
                )))
            }
            n => Err(SessionError::InvalidResponse(format!(
                "expected at most one profile for {user_id}, found {n}"
            ))),
        }
    }
}

#[async_trait]
impl SignInProvider for HostedBackend {
    async fn sign_in(&self, email: &str, password: &str) -> SessionResult<Session> {
        let response = self
            .with_api_key(self.client.post(self.url("/auth/v1/token")))
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED
        ) {
            return Err(SessionError::InvalidCredentials);
        }

        let grant: TokenResponse = handle_response(response).await?;
        let mut session = Session::new(
            grant.user.id,
            grant.user.email.unwrap_or_else(|| email.to_string()),
            grant.access_token,
        );
        if let Some(secs) = grant.expires_in.filter(|secs| *secs > 0) {
            let expires_at = TimeDelta::try_seconds(secs)
                .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
                .ok_or_else(|| {
                    SessionError::InvalidResponse(format!("token lifetime out of range: {secs}s"))
                })?;
            session = session.with_expiry(expires_at);
        }
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> SessionResult<()> {
        let response = self
            .with_api_key(self.client.post(self.url("/auth/v1/logout")))
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(backend_error(response).await)
        }
    }
}

//! Common test utilities and fixtures.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use reqwest::{header, redirect::Policy, Client, Response};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::sleep;

use stp_gate::{InMemoryEventLogger, ACCESS_TOKEN_COOKIE};
use stp_model::Role;
use stp_server::{AppState, Server, ServerConfig};

/// Password shared by every seeded account.
pub const PASSWORD: &str = "correct-horse";

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const CUSTOMER_EMAIL: &str = "customer@example.com";
pub const TECHNICIAN_EMAIL: &str = "tech@example.com";
pub const SUPER_ROLE_EMAIL: &str = "root@example.com";
/// Account whose role is not one of the portal roles.
pub const AUDITOR_EMAIL: &str = "auditor@example.com";

/// Test environment running a portal server on an ephemeral port.
pub struct TestEnv {
    /// Base URL of the running server.
    pub base_url: String,
    /// HTTP client that does not follow redirects.
    pub client: Client,
    /// Events recorded by the server.
    pub events: Arc<InMemoryEventLogger>,
    /// Server shutdown signal.
    _shutdown_tx: oneshot::Sender<()>,
}

impl TestEnv {
    /// Starts a memory-mode server seeded with one account per role.
    pub async fn memory() -> anyhow::Result<Self> {
        let config = ServerConfig::for_testing()
            .with_memory_user(ADMIN_EMAIL, PASSWORD, Role::Admin)
            .with_memory_user(CUSTOMER_EMAIL, PASSWORD, Role::Customer)
            .with_memory_user(TECHNICIAN_EMAIL, PASSWORD, Role::Technician)
            .with_memory_user(SUPER_ROLE_EMAIL, PASSWORD, Role::SuperAdmin)
            .with_memory_user(stp_gate::SUPER_ADMIN_EMAIL, PASSWORD, Role::Technician)
            .with_memory_user(AUDITOR_EMAIL, PASSWORD, "Auditor");
        Self::start(config).await
    }

    /// Starts a server for `config`.
    pub async fn start(config: ServerConfig) -> anyhow::Result<Self> {
        // Initialize tracing for tests
        let _ = tracing_subscriber::fmt()
            .with_env_filter("stp_server=debug,stp_gate=debug,stp_session=debug")
            .with_test_writer()
            .try_init();

        let events = Arc::new(InMemoryEventLogger::new());
        let state = AppState::with_event_logger(config, events.clone())?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        // Create shutdown channel
        let (_shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        // Start server
        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = Server::with_state(state).serve(listener, shutdown).await {
                tracing::error!("Server error: {}", e);
            }
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(Policy::none())
            .build()?;

        wait_for_server(&client, &base_url).await?;

        Ok(Self {
            base_url,
            client,
            events,
            _shutdown_tx,
        })
    }

    /// Returns the absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submits the login form.
    pub async fn submit_login(&self, email: &str, password: &str) -> anyhow::Result<Response> {
        Ok(self
            .client
            .post(self.url("/auth/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await?)
    }

    /// Signs in and returns the `Cookie` header value carrying the token.
    pub async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<String> {
        let response = self.submit_login(email, password).await?;
        anyhow::ensure!(
            response.status() == StatusCode::SEE_OTHER,
            "sign-in for {email} failed with {}",
            response.status()
        );
        token_cookie(&response)
            .ok_or_else(|| anyhow::anyhow!("sign-in for {email} set no token cookie"))
    }

    /// Fetches `path`, optionally presenting a cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> anyhow::Result<Response> {
        let mut request = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        Ok(request.send().await?)
    }
}

/// Returns the redirect target of a response.
pub fn location(response: &Response) -> Option<&str> {
    response.headers().get(header::LOCATION)?.to_str().ok()
}

/// Returns the raw `Set-Cookie` header of a response.
pub fn set_cookie(response: &Response) -> Option<&str> {
    response.headers().get(header::SET_COOKIE)?.to_str().ok()
}

/// Extracts `stp-access-token=<value>` from a response's `Set-Cookie`.
pub fn token_cookie(response: &Response) -> Option<String> {
    let pair = set_cookie(response)?.split(';').next()?.trim();
    let value = pair.strip_prefix(ACCESS_TOKEN_COOKIE)?.strip_prefix('=')?;
    (!value.is_empty()).then(|| pair.to_string())
}

/// Waits for the server to be ready.
async fn wait_for_server(client: &Client, base_url: &str) -> anyhow::Result<()> {
    let health_url = format!("{}/health", base_url);
    let max_attempts = 50;

    for attempt in 1..=max_attempts {
        match client.get(&health_url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Server ready after {} attempts", attempt);
                return Ok(());
            }
            Ok(response) => {
                tracing::debug!(
                    "Server not ready (status {}), attempt {}/{}",
                    response.status(),
                    attempt,
                    max_attempts
                );
            }
            Err(e) => {
                tracing::debug!(
                    "Server not ready ({}), attempt {}/{}",
                    e,
                    attempt,
                    max_attempts
                );
            }
        }
        sleep(Duration::from_millis(100)).await;
    }

    anyhow::bail!("Server did not become ready in time")
}

/// Fake hosted backend.
///
/// Tokens map to users as follows:
/// - `tech-token`: a Technician
/// - `owner-token`: a Customer signed in as the super-admin email
/// - `orphan-token`: a user with no profile row
/// - `broken-token`: the auth API fails with 500
pub mod hosted {
    use super::*;

    pub const TECH_ID: &str = "0191c7a4-6a4e-7c1e-9a0b-00000000000a";
    pub const OWNER_ID: &str = "0191c7a4-6a4e-7c1e-9a0b-00000000000b";
    pub const ORPHAN_ID: &str = "0191c7a4-6a4e-7c1e-9a0b-00000000000c";

    pub const ANON_KEY: &str = "anon-key";

    fn bearer(headers: &HeaderMap) -> Option<&str> {
        headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
    }

    fn user_for(token: &str) -> Option<Value> {
        match token {
            "tech-token" => Some(json!({"id": TECH_ID, "email": TECHNICIAN_EMAIL})),
            "owner-token" => Some(json!({"id": OWNER_ID, "email": stp_gate::SUPER_ADMIN_EMAIL})),
            "orphan-token" => Some(json!({"id": ORPHAN_ID, "email": "orphan@example.com"})),
            _ => None,
        }
    }

    fn token_for(email: &str) -> Option<&'static str> {
        match email {
            TECHNICIAN_EMAIL => Some("tech-token"),
            stp_gate::SUPER_ADMIN_EMAIL => Some("owner-token"),
            "orphan@example.com" => Some("orphan-token"),
            _ => None,
        }
    }

    /// Starts the fake backend and returns its address.
    pub async fn start() -> anyhow::Result<SocketAddr> {
        let app = Router::new()
            .route(
                "/auth/v1/user",
                get(|headers: HeaderMap| async move {
                    if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some(ANON_KEY) {
                        return (StatusCode::UNAUTHORIZED, Json(json!({"msg": "no apikey"})))
                            .into_response();
                    }
                    match bearer(&headers) {
                        Some("broken-token") => {
                            (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
                        }
                        Some(token) => match user_for(token) {
                            Some(user) => Json(user).into_response(),
                            None => (StatusCode::UNAUTHORIZED, Json(json!({"msg": "bad jwt"})))
                                .into_response(),
                        },
                        None => (StatusCode::UNAUTHORIZED, Json(json!({"msg": "no jwt"})))
                            .into_response(),
                    }
                }),
            )
            .route(
                "/rest/v1/profiles",
                get(
                    |Query(q): Query<std::collections::HashMap<String, String>>| async move {
                        let id = q.get("id").cloned().unwrap_or_default();
                        let rows = if id == format!("eq.{TECH_ID}") {
                            json!([{"role": "Technician", "email": TECHNICIAN_EMAIL}])
                        } else if id == format!("eq.{OWNER_ID}") {
                            json!([{"role": "Customer", "email": stp_gate::SUPER_ADMIN_EMAIL}])
                        } else {
                            json!([])
                        };
                        Json(rows)
                    },
                ),
            )
            .route(
                "/auth/v1/token",
                post(|Json(body): Json<Value>| async move {
                    let email = body["email"].as_str().unwrap_or_default();
                    match token_for(email) {
                        Some(token) if body["password"] == PASSWORD => {
                            let user = user_for(token).unwrap_or_default();
                            Json(json!({
                                "access_token": token,
                                "expires_in": 3600,
                                "user": user
                            }))
                            .into_response()
                        }
                        _ => (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"})))
                            .into_response(),
                    }
                }),
            )
            .route("/auth/v1/logout", post(|| async { StatusCode::NO_CONTENT }));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Fake backend error: {}", e);
            }
        });
        Ok(addr)
    }
}

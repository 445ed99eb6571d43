//! Router configuration.
//!
//! This module creates the main Axum router that combines all endpoints.

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use stp_gate::{require_roles, RoleRequirement, ADMIN_PATH, CUSTOMER_PATH, LOGIN_PATH, TECHNICIAN_PATH};
use stp_model::Role;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::BackendMode;
use crate::state::AppState;
use crate::ui;

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let health = Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check))
        .with_state(state.clone());

    let auth = Router::new()
        .route("/", get(ui::root))
        .route(LOGIN_PATH, get(ui::login_page).post(ui::login_submit))
        .route(ui::LOGOUT_PATH, post(ui::logout_submit))
        .with_state(state.clone());

    let app = Router::new()
        .merge(health)
        .merge(auth)
        .merge(protected_area(&state, ADMIN_PATH, Role::Admin, ui::admin_area))
        .merge(protected_area(&state, CUSTOMER_PATH, Role::Customer, ui::customer_area))
        .merge(protected_area(
            &state,
            TECHNICIAN_PATH,
            Role::Technician,
            ui::technician_area,
        ));

    app.layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
}

/// Mounts one role-gated area.
fn protected_area<H, T>(state: &AppState, path: &str, role: Role, handler: H) -> Router
where
    H: axum::handler::Handler<T, ()>,
    T: 'static,
{
    Router::new()
        .route(path, get(handler))
        .route_layer(middleware::from_fn(require_roles(
            state.gate.clone(),
            RoleRequirement::only(role),
        )))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend: Option<&'static str>,
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        backend: None,
    })
}

/// Kubernetes liveness probe.
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Kubernetes readiness probe.
///
/// Providers are built before the listener binds, so a running server is
/// ready; the response reports which backend it reads from.
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let backend = match state.config.backend {
        BackendMode::Hosted => "hosted",
        BackendMode::Memory => "memory",
    };
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ready",
            version: None,
            backend: Some(backend),
        }),
    )
}

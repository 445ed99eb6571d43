//! Axum integration for the access gate.
//!
//! Protected routes are wrapped with [`require_roles`]:
//!
//! ```ignore
//! let router = Router::new()
//!     .route("/admin", get(admin_area))
//!     .layer(middleware::from_fn(require_roles(gate, RoleRequirement::only(Role::Admin))));
//! ```
//!
//! The caller's token is read from `Authorization: Bearer <token>` or,
//! failing that, from the [`ACCESS_TOKEN_COOKIE`] cookie.

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{FromRequestParts, Request},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use stp_model::{Profile, Session, SessionContext};

use crate::decision::{AccessState, LOGIN_PATH};
use crate::gate::AccessGate;
use crate::requirement::RoleRequirement;

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "stp-access-token";

const FORBIDDEN_BODY: &str = "Your account has no area in this portal. Ask an administrator to assign a role.";

/// The authorized caller of a protected handler.
///
/// Inserted into request extensions by [`require_roles`]. Extracting it
/// outside a protected route redirects to login.
#[derive(Debug, Clone)]
pub struct Viewer {
    /// Resolved session.
    pub session: Session,
    /// Profile of the session subject.
    pub profile: Profile,
}

/// Builds the gate input for a request.
#[must_use]
pub fn session_context(headers: &HeaderMap, path: &str) -> SessionContext {
    let ctx = bearer_token(headers)
        .or_else(|| cookie_value(headers, ACCESS_TOKEN_COOKIE))
        .map_or_else(SessionContext::anonymous, SessionContext::with_token);
    ctx.at_path(path)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Creates a middleware layer admitting only the given roles.
///
/// Authorized callers reach the wrapped handler with a [`Viewer`] in the
/// request extensions. Everyone else gets `303 See Other` to the redirect
/// target of the decision, unless that target is the requested path itself,
/// which is answered with `403 Forbidden` instead.
pub fn require_roles(
    gate: AccessGate,
    requirement: RoleRequirement,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    move |mut request: Request, next: Next| {
        let gate = gate.clone();
        let requirement = requirement.clone();
        Box::pin(async move {
            let ctx = session_context(request.headers(), request.uri().path());
            let resolution = gate.resolve(&ctx, &requirement).await;

            match (resolution.state, resolution.session, resolution.profile) {
                (AccessState::Authorized, Some(session), Some(profile)) => {
                    request.extensions_mut().insert(Viewer { session, profile });
                    next.run(request).await
                }
                (state, _, _) => {
                    let target = state.redirect_target().unwrap_or(LOGIN_PATH);
                    if target == request.uri().path() {
                        tracing::debug!(path = %target, "Landing area refuses its own caller");
                        return (StatusCode::FORBIDDEN, FORBIDDEN_BODY).into_response();
                    }
                    Redirect::to(target).into_response()
                }
            }
        })
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}

//! Login, logout and area page handlers.

use askama::Template;
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use serde::Deserialize;
use stp_core::event::{AccessEvent, EventType};
use stp_gate::{
    is_super_privileged, session_context, Viewer, ACCESS_TOKEN_COOKIE, LOGIN_PATH,
};
use stp_model::Session;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Logout entry point.
pub const LOGOUT_PATH: &str = "/auth/logout";

/// Login page template.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    /// Form action URL.
    pub action_url: &'static str,
    /// Email to prefill.
    pub email: String,
    /// Error message to display.
    pub error: Option<String>,
}

/// Protected area template.
#[derive(Template)]
#[template(path = "area.html")]
pub struct AreaTemplate {
    /// Area heading.
    pub title: &'static str,
    /// Viewer email.
    pub email: String,
    /// Viewer role label.
    pub role: String,
    /// Whether the viewer bypasses role checks.
    pub super_privileged: bool,
    /// Logout form action.
    pub logout_url: &'static str,
}

/// Form data for login submission.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Email.
    pub email: String,
    /// Password.
    pub password: String,
}

fn login_template(email: String, error: Option<String>) -> LoginTemplate {
    LoginTemplate {
        action_url: LOGIN_PATH,
        email,
        error,
    }
}

/// Redirects the site root to the viewer's area, or to login.
pub async fn root(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    let ctx = session_context(&headers, "/");
    let target = state
        .gate
        .landing_for(&ctx)
        .await
        .redirect_target()
        .unwrap_or(LOGIN_PATH);
    Redirect::to(target)
}

/// Shows the login page.
pub async fn login_page() -> ServerResult<Html<String>> {
    Ok(Html(login_template(String::new(), None).render()?))
}

/// Handles login form submission.
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ServerResult<Response> {
    let email = form.email.trim().to_string();

    let session = match state.sign_in.sign_in(&email, &form.password).await {
        Ok(session) => session,
        Err(e) => {
            tracing::debug!(error = %e, "Sign-in failed");
            state.events.log(
                AccessEvent::builder(EventType::SignInError)
                    .email(email.clone())
                    .path(LOGIN_PATH)
                    .failure(e.to_string())
                    .build(),
            );

            let err = ServerError::from(e);
            let html = login_template(email, Some(err.public_message())).render()?;
            return Ok((err.status_code(), Html(html)).into_response());
        }
    };

    state.events.log(
        AccessEvent::builder(EventType::SignIn)
            .user(session.user_id)
            .email(session.email.clone())
            .path(LOGIN_PATH)
            .redirect("/")
            .build(),
    );

    let cookie = session_cookie(&session, state.config.cookie_secure)?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

/// Signs the caller out and clears the token cookie.
pub async fn logout_submit(State(state): State<AppState>, headers: HeaderMap) -> ServerResult<Response> {
    let ctx = session_context(&headers, LOGOUT_PATH);

    if let Some(token) = ctx.access_token() {
        if let Err(e) = state.sign_in.sign_out(token).await {
            tracing::warn!(error = %e, "Sign-out failed at the backend; clearing cookie anyway");
        }
        state
            .events
            .log(AccessEvent::builder(EventType::SignOut).path(LOGOUT_PATH).build());
    }

    let cookie = cleared_cookie(state.config.cookie_secure)?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to(LOGIN_PATH)).into_response())
}

/// Administrator area.
pub async fn admin_area(viewer: Viewer) -> ServerResult<Html<String>> {
    render_area("Administration", &viewer)
}

/// Customer area.
pub async fn customer_area(viewer: Viewer) -> ServerResult<Html<String>> {
    render_area("Customer portal", &viewer)
}

/// Technician area.
pub async fn technician_area(viewer: Viewer) -> ServerResult<Html<String>> {
    render_area("Technician workspace", &viewer)
}

fn render_area(title: &'static str, viewer: &Viewer) -> ServerResult<Html<String>> {
    let template = AreaTemplate {
        title,
        email: viewer.profile.email.clone(),
        role: viewer.profile.role.to_string(),
        super_privileged: is_super_privileged(&viewer.profile),
        logout_url: LOGOUT_PATH,
    };
    Ok(Html(template.render()?))
}

/// Builds the `Set-Cookie` value carrying a session's access token.
///
/// Sessions without an expiry get a browser-session cookie.
pub fn session_cookie(session: &Session, secure: bool) -> ServerResult<HeaderValue> {
    let mut cookie = format!(
        "{ACCESS_TOKEN_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/",
        session.access_token
    );
    if let Some(remaining) = session.remaining_at(Utc::now()) {
        cookie.push_str(&format!("; Max-Age={}", remaining.as_secs()));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|_| ServerError::BadRequest("access token is not a valid cookie value".to_string()))
}

/// Builds the `Set-Cookie` value that removes the access token.
pub fn cleared_cookie(secure: bool) -> ServerResult<HeaderValue> {
    let mut cookie = format!("{ACCESS_TOKEN_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| ServerError::Internal(e.to_string()))
}

//! Login and logout integration tests.

use reqwest::{header, StatusCode};
use stp_core::{EventOutcome, EventType};

use crate::common::{location, set_cookie, token_cookie, TestEnv, CUSTOMER_EMAIL, PASSWORD};

/// Health endpoints respond once the server is up.
#[tokio::test]
async fn test_health_endpoints() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;

    let health: serde_json::Value = env.get("/health", None).await?.json().await?;
    assert_eq!(health["status"], "healthy");

    let ready: serde_json::Value = env.get("/health/ready", None).await?.json().await?;
    assert_eq!(ready["backend"], "memory");

    assert_eq!(env.get("/health/live", None).await?.status(), StatusCode::OK);
    Ok(())
}

/// The login page renders a form posting back to itself.
#[tokio::test]
async fn test_login_page_renders() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;

    let response = env.get("/auth/login", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await?;
    assert!(body.contains(r#"action="/auth/login""#));
    assert!(body.contains(r#"name="password""#));
    Ok(())
}

/// Successful sign-in sets an HttpOnly token cookie and redirects to the root.
#[tokio::test]
async fn test_sign_in_sets_cookie() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;

    let response = env.submit_login(CUSTOMER_EMAIL, PASSWORD).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let raw = set_cookie(&response).unwrap_or_default().to_string();
    assert!(raw.contains("HttpOnly"), "{raw}");
    assert!(raw.contains("SameSite=Lax"), "{raw}");
    assert!(raw.contains("Max-Age="), "{raw}");
    assert!(!raw.contains("Secure"), "{raw}");

    let cookie = token_cookie(&response).expect("token cookie");
    let root = env.get("/", Some(&cookie)).await?;
    assert_eq!(location(&root), Some("/customer"));

    let sign_ins = env.events.events_of(EventType::SignIn);
    assert_eq!(sign_ins.len(), 1);
    assert_eq!(sign_ins[0].email.as_deref(), Some(CUSTOMER_EMAIL));
    Ok(())
}

/// Wrong credentials re-render the form with 401 and keep the email.
#[tokio::test]
async fn test_bad_credentials_are_rejected() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;

    for (email, password) in [(CUSTOMER_EMAIL, "wrong"), ("nobody@example.com", PASSWORD)] {
        let response = env.submit_login(email, password).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{email}");
        assert!(set_cookie(&response).is_none(), "{email}");

        let body = response.text().await?;
        assert!(body.contains("Invalid email or password"), "{email}");
        assert!(body.contains(email), "{email}");
    }

    let errors = env.events.events_of(EventType::SignInError);
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.outcome == EventOutcome::Failure));
    Ok(())
}

/// Logout revokes the session and clears the cookie.
#[tokio::test]
async fn test_logout_clears_session() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;
    let cookie = env.sign_in(CUSTOMER_EMAIL, PASSWORD).await?;

    assert_eq!(
        env.get("/customer", Some(&cookie)).await?.status(),
        StatusCode::OK
    );

    let response = env
        .client
        .post(env.url("/auth/logout"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
    assert!(token_cookie(&response).is_none());
    assert!(set_cookie(&response).unwrap_or_default().contains("Max-Age=0"));

    // The old token no longer resolves.
    let response = env.get("/customer", Some(&cookie)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));

    assert_eq!(env.events.events_of(EventType::SignOut).len(), 1);
    Ok(())
}

/// Logging out without a session still clears the cookie.
#[tokio::test]
async fn test_anonymous_logout() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;

    let response = env.client.post(env.url("/auth/logout")).send().await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
    assert!(env.events.events_of(EventType::SignOut).is_empty());
    Ok(())
}

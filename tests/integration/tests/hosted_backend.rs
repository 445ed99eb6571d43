//! Integration tests against a fake hosted backend.

use reqwest::{header, StatusCode};
use stp_core::{BackendConfig, EventType};
use stp_server::ServerConfig;

use crate::common::{hosted, location, TestEnv, PASSWORD, TECHNICIAN_EMAIL};

async fn hosted_env() -> anyhow::Result<TestEnv> {
    let addr = hosted::start().await?;
    let config = ServerConfig::for_testing()
        .with_hosted_backend(BackendConfig::new(format!("http://{addr}"), hosted::ANON_KEY));
    TestEnv::start(config).await
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// A technician token resolves through the auth API and profiles table.
#[tokio::test]
async fn test_hosted_technician() -> anyhow::Result<()> {
    let env = hosted_env().await?;

    let response = env
        .client
        .get(env.url("/technician"))
        .header(header::AUTHORIZATION, bearer("tech-token"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await?.contains(TECHNICIAN_EMAIL));

    let response = env
        .client
        .get(env.url("/admin"))
        .header(header::AUTHORIZATION, bearer("tech-token"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/technician"));

    let ready: serde_json::Value = env.get("/health/ready", None).await?.json().await?;
    assert_eq!(ready["backend"], "hosted");
    Ok(())
}

/// The super-admin email is admitted even though its profile row says Customer.
#[tokio::test]
async fn test_hosted_super_admin_email() -> anyhow::Result<()> {
    let env = hosted_env().await?;

    let response = env
        .client
        .get(env.url("/admin"))
        .header(header::AUTHORIZATION, bearer("owner-token"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

/// Missing profiles and failing auth calls send the caller to login.
#[tokio::test]
async fn test_hosted_fails_closed() -> anyhow::Result<()> {
    let env = hosted_env().await?;

    for token in ["orphan-token", "broken-token", "revoked-token"] {
        let response = env
            .client
            .get(env.url("/customer"))
            .header(header::AUTHORIZATION, bearer(token))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{token}");
        assert_eq!(location(&response), Some("/auth/login"), "{token}");
    }

    let login_required = env.events.events_of(EventType::LoginRequired);
    assert_eq!(login_required.len(), 3);
    assert!(login_required
        .iter()
        .any(|event| event.error.is_some()), "backend failure should be recorded");
    Ok(())
}

/// Signing in through the password grant lands the technician on their area.
#[tokio::test]
async fn test_hosted_sign_in() -> anyhow::Result<()> {
    let env = hosted_env().await?;

    let rejected = env.submit_login(TECHNICIAN_EMAIL, "wrong").await?;
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

    let cookie = env.sign_in(TECHNICIAN_EMAIL, PASSWORD).await?;
    assert_eq!(cookie, "stp-access-token=tech-token");

    let root = env.get("/", Some(&cookie)).await?;
    assert_eq!(location(&root), Some("/technician"));
    Ok(())
}

/// An unreachable backend denies access and reports sign-in as unavailable.
#[tokio::test]
async fn test_unreachable_backend() -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let config = ServerConfig::for_testing()
        .with_hosted_backend(BackendConfig::new(format!("http://{addr}"), hosted::ANON_KEY));
    let env = TestEnv::start(config).await?;

    let response = env
        .client
        .get(env.url("/admin"))
        .header(header::AUTHORIZATION, bearer("tech-token"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));

    let login = env.submit_login(TECHNICIAN_EMAIL, PASSWORD).await?;
    assert_eq!(login.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(login.text().await?.contains("temporarily unavailable"));
    Ok(())
}

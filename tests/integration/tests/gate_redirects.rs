//! Role gate integration tests.

use reqwest::{header, StatusCode};
use stp_core::EventType;

use crate::common::{
    location, TestEnv, ADMIN_EMAIL, AUDITOR_EMAIL, CUSTOMER_EMAIL, PASSWORD, SUPER_ROLE_EMAIL,
    TECHNICIAN_EMAIL,
};

const AREAS: [&str; 3] = ["/admin", "/customer", "/technician"];

/// Anonymous callers are sent to login from every area and from the root.
#[tokio::test]
async fn test_anonymous_is_sent_to_login() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;

    for path in AREAS.into_iter().chain(["/"]) {
        let response = env.get(path, None).await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), Some("/auth/login"), "{path}");
    }

    assert_eq!(env.events.events_of(EventType::LoginRequired).len(), 3);
    Ok(())
}

/// Each role renders its own area and is bounced from the others.
#[tokio::test]
async fn test_roles_land_on_their_area() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;

    let cases = [
        (ADMIN_EMAIL, "/admin"),
        (CUSTOMER_EMAIL, "/customer"),
        (TECHNICIAN_EMAIL, "/technician"),
    ];

    for (email, home) in cases {
        let cookie = env.sign_in(email, PASSWORD).await?;

        let root = env.get("/", Some(&cookie)).await?;
        assert_eq!(location(&root), Some(home), "root for {email}");

        for area in AREAS {
            let response = env.get(area, Some(&cookie)).await?;
            if area == home {
                assert_eq!(response.status(), StatusCode::OK, "{email} on {area}");
                let body = response.text().await?;
                assert!(body.contains(email), "{email} not shown on {area}");
            } else {
                assert_eq!(response.status(), StatusCode::SEE_OTHER, "{email} on {area}");
                assert_eq!(location(&response), Some(home), "{email} on {area}");
            }
        }
    }

    Ok(())
}

/// The super-admin email and the SuperAdmin role enter every area.
#[tokio::test]
async fn test_super_privileged_enter_every_area() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;

    for email in [stp_gate::SUPER_ADMIN_EMAIL, SUPER_ROLE_EMAIL] {
        let cookie = env.sign_in(email, PASSWORD).await?;

        for area in AREAS {
            let response = env.get(area, Some(&cookie)).await?;
            assert_eq!(response.status(), StatusCode::OK, "{email} on {area}");
            let body = response.text().await?;
            assert!(body.contains("full access"), "{email} on {area}");
        }

        let root = env.get("/", Some(&cookie)).await?;
        assert_eq!(location(&root), Some("/admin"), "root for {email}");
    }

    assert!(env.events.events_of(EventType::AccessForbidden).is_empty());
    Ok(())
}

/// A role outside the portal's roles lands on the technician area, which
/// answers 403 rather than redirecting to itself.
#[tokio::test]
async fn test_unknown_role_lands_on_technician() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;
    let cookie = env.sign_in(AUDITOR_EMAIL, PASSWORD).await?;

    let response = env.get("/admin", Some(&cookie)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/technician"));

    let root = env.get("/", Some(&cookie)).await?;
    assert_eq!(location(&root), Some("/technician"));

    // The landing area refuses the caller without sending them back to itself.
    let response = env.get("/technician", Some(&cookie)).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(location(&response), None);
    assert!(response.text().await?.contains("no area in this portal"));
    Ok(())
}

/// A bearer header is accepted in place of the cookie.
#[tokio::test]
async fn test_bearer_header_is_accepted() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;
    let cookie = env.sign_in(CUSTOMER_EMAIL, PASSWORD).await?;
    let token = cookie
        .split_once('=')
        .map(|(_, token)| token.to_string())
        .unwrap_or_default();

    let response = env
        .client
        .get(env.url("/customer"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

/// Unknown tokens are treated as anonymous.
#[tokio::test]
async fn test_unknown_token_is_sent_to_login() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;

    let response = env
        .get("/customer", Some("stp-access-token=not-a-real-token"))
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
    Ok(())
}

/// Forbidden decisions are recorded with their redirect.
#[tokio::test]
async fn test_forbidden_access_is_recorded() -> anyhow::Result<()> {
    let env = TestEnv::memory().await?;
    let cookie = env.sign_in(CUSTOMER_EMAIL, PASSWORD).await?;
    env.events.clear();

    env.get("/admin", Some(&cookie)).await?;

    let forbidden = env.events.events_of(EventType::AccessForbidden);
    assert_eq!(forbidden.len(), 1);
    assert_eq!(forbidden[0].email.as_deref(), Some(CUSTOMER_EMAIL));
    assert_eq!(forbidden[0].role.as_deref(), Some("Customer"));
    assert_eq!(forbidden[0].path.as_deref(), Some("/admin"));
    assert_eq!(forbidden[0].redirect.as_deref(), Some("/customer"));
    Ok(())
}

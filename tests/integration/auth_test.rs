//! Integration tests for the login flow and the session gate.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use std::sync::Arc;

use chrono::Duration;

use helpers::TestApp;
use minkan_auth::ManualClock;
use minkan_core::config::AppConfig;

#[tokio::test]
async fn test_healthz_is_public() {
    let app = TestApp::new();

    let response = app.request("GET", "/healthz", None, &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "health check OK");
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = TestApp::new();

    for path in ["/v1/minkan", "/v1/users/me"] {
        let response = app.request("GET", path, None, &[]).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{path}");
    }

    let response = app
        .request("GET", "/v1/minkan", None, &[("cookie", "session_id=forged")])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_redirects_to_provider_with_state_cookie() {
    let app = TestApp::new();

    let response = app.request("GET", "/v1/auth/login", None, &[]).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let state = response.cookie("oidc_state").unwrap();
    let location = response.location().unwrap();
    assert!(location.starts_with(helpers::ISSUER));
    assert!(location.ends_with(&format!("state={state}")));
    assert!(response.set_cookie("oidc_state").unwrap().contains("HttpOnly"));
}

#[tokio::test]
async fn test_callback_sets_session_cookies() {
    let app = TestApp::new();

    let start = app.request("GET", "/v1/auth/login", None, &[]).await;
    let state = start.cookie("oidc_state").unwrap();

    let response = app
        .request(
            "GET",
            &format!("/v1/auth/callback?code=alice&state={state}"),
            None,
            &[("cookie", &format!("oidc_state={state}"))],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some(app.state.config.login.redirect_after_login.as_str())
    );

    let session = response.set_cookie("session_id").unwrap();
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("SameSite=Lax"));
    assert!(session.contains("Max-Age=43200"));

    let csrf = response.set_cookie("csrf_token").unwrap();
    assert!(!csrf.contains("HttpOnly"));
    assert_eq!(response.cookie("csrf_token").unwrap().len(), 43);

    // The one-shot state cookie is cleared.
    assert!(response.set_cookie("oidc_state").unwrap().contains("Max-Age=0"));

    assert_eq!(app.state.sessions.len().await, 1);
}

#[tokio::test]
async fn test_callback_rejects_state_mismatch() {
    let app = TestApp::new();

    let start = app.request("GET", "/v1/auth/login", None, &[]).await;
    let state = start.cookie("oidc_state").unwrap();

    // Cookie from a different browser.
    let response = app
        .request(
            "GET",
            &format!("/v1/auth/callback?code=mallory&state={state}"),
            None,
            &[("cookie", "oidc_state=other")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // No cookie at all.
    let response = app
        .request(
            "GET",
            &format!("/v1/auth/callback?code=mallory&state={state}"),
            None,
            &[],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // State never issued by the provider.
    let response = app
        .request(
            "GET",
            "/v1/auth/callback?code=mallory&state=unknown",
            None,
            &[("cookie", "oidc_state=unknown")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    assert!(app.state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_callback_with_provider_error() {
    let app = TestApp::new();

    let response = app
        .request(
            "GET",
            "/v1/auth/callback?error=access_denied&state=s",
            None,
            &[("cookie", "oidc_state=s")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_state_changing_requests_need_csrf() {
    let app = TestApp::new();
    let session = app.login("bob").await;
    let body = json!({ "minkan": { "a": 1 }, "version": 1 });

    // No header.
    let response = app
        .request(
            "PUT",
            "/v1/minkan",
            Some(body.clone()),
            &[("cookie", &session.cookie_header())],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Header does not match the cookie.
    let response = app
        .request(
            "PUT",
            "/v1/minkan",
            Some(body.clone()),
            &[
                ("cookie", &session.cookie_header()),
                ("x-csrf-token", "not-the-cookie"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // The rejected writes changed nothing.
    let response = app.get("/v1/minkan", &session).await;
    assert_eq!(response.body["version"], 1);

    let response = app.send("PUT", "/v1/minkan", Some(body), &session).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["version"], 2);
}

#[tokio::test]
async fn test_preflight_bypasses_gate() {
    let app = TestApp::new();

    let response = app
        .request(
            "OPTIONS",
            "/v1/minkan",
            None,
            &[
                ("origin", "http://localhost:5173"),
                ("access-control-request-method", "PUT"),
                ("access-control-request-headers", "content-type,x-csrf-token"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers["access-control-allow-origin"],
        "http://localhost:5173"
    );
    assert_eq!(response.headers["access-control-allow-credentials"], "true");
}

#[tokio::test]
async fn test_logout_ends_session_and_clears_cookies() {
    let app = TestApp::new();
    let session = app.login("carol").await;

    let response = app.send("POST", "/v1/auth/logout", None, &session).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "logged out");
    assert_eq!(
        response.body["redirectTo"],
        app.state.config.login.redirect_after_logout
    );
    assert!(response.set_cookie("session_id").unwrap().contains("Max-Age=0"));
    assert!(response.set_cookie("csrf_token").unwrap().contains("Max-Age=0"));

    let response = app.get("/v1/minkan", &session).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // Logging out an already-ended session still succeeds.
    let response = app.send("POST", "/v1/auth/logout", None, &session).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_checks_session_and_csrf() {
    let app = TestApp::new();
    let session = app.login("dave").await;

    let response = app.request("POST", "/v1/auth/logout", None, &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "POST",
            "/v1/auth/logout",
            None,
            &[("cookie", &session.cookie_header())],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Session survives the rejected attempts.
    let response = app.get("/v1/minkan", &session).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let mut config = AppConfig::default();
    config.session.ttl_minutes = 0;
    let app = TestApp::with_config(config);

    let session = app.login("erin").await;

    let response = app.get("/v1/minkan", &session).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_session_expires_when_clock_passes_ttl() {
    let clock = Arc::new(ManualClock::default());
    let app = TestApp::with_clock(Arc::clone(&clock));

    let session = app.login("frank").await;
    assert_eq!(app.get("/v1/minkan", &session).await.status, StatusCode::OK);

    clock.advance(Duration::hours(11));
    assert_eq!(app.get("/v1/users/me", &session).await.status, StatusCode::OK);

    clock.advance(Duration::hours(1));
    let response = app.get("/v1/minkan", &session).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_oversized_lifetimes_do_not_panic() {
    let mut config = AppConfig::default();
    config.session.ttl_minutes = u64::MAX;
    config.oidc.state_ttl_seconds = u64::MAX;
    let app = TestApp::with_config(config);

    let start = app.request("GET", "/v1/auth/login", None, &[]).await;
    assert_eq!(start.status, StatusCode::SEE_OTHER);
    assert!(start.set_cookie("oidc_state").unwrap().contains("Max-Age=86400"));

    let session = app.login("gina").await;
    assert_eq!(app.get("/v1/minkan", &session).await.status, StatusCode::OK);
}

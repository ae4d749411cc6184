//! Integration tests for the signed-in user's account.

mod helpers;

use axum::http::StatusCode;

use helpers::TestApp;
use minkan_database::DocumentStore;

#[tokio::test]
async fn test_me_returns_profile() {
    let app = TestApp::new();
    let session = app.login("alice").await;

    let response = app.get("/v1/users/me", &session).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["userId"].as_i64().unwrap() > 0);
    assert_eq!(response.body["displayName"], "User alice");
    assert_eq!(response.body["email"], "alice@example.com");
    assert_eq!(response.body["emailVerified"], true);
}

#[tokio::test]
async fn test_delete_requires_csrf() {
    let app = TestApp::new();
    let session = app.login("bob").await;

    let response = app
        .request(
            "DELETE",
            "/v1/users/me",
            None,
            &[("cookie", &session.cookie_header())],
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let response = app.get("/v1/users/me", &session).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_removes_account_document_and_session() {
    let app = TestApp::new();
    let session = app.login("carol").await;
    let user_id = app.get("/v1/users/me", &session).await.body["userId"]
        .as_i64()
        .unwrap();

    let response = app.send("DELETE", "/v1/users/me", None, &session).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.set_cookie("session_id").unwrap().contains("Max-Age=0"));
    assert!(response.set_cookie("csrf_token").unwrap().contains("Max-Age=0"));

    let response = app.get("/v1/users/me", &session).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    assert!(app.store.read(user_id.into()).await.is_err());

    // Logging in again provisions a fresh account.
    let again = app.login("carol").await;
    let response = app.get("/v1/users/me", &again).await;
    assert_ne!(response.body["userId"].as_i64().unwrap(), user_id);
    let response = app.get("/v1/minkan", &again).await;
    assert_eq!(response.body["version"], 1);
}

//! Integration tests for reading and writing the versioned document.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_new_user_gets_default_document() {
    let app = TestApp::new();
    let session = app.login("alice").await;

    let response = app.get("/v1/minkan", &session).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["version"], 1);

    let doc = &response.body["minkan"];
    let project = doc["currentPjId"].as_str().unwrap();
    assert!(doc["projects"][project].is_object());
    for column in ["backlog", "todo", "doing", "done"] {
        assert_eq!(doc["kanbanColumns"][column], json!([]), "{column}");
    }
}

#[tokio::test]
async fn test_write_bumps_version() {
    let app = TestApp::new();
    let session = app.login("bob").await;

    let response = app
        .send(
            "PUT",
            "/v1/minkan",
            Some(json!({ "minkan": { "doc": "X" }, "version": 1 })),
            &session,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "version": 2 }));

    let response = app.get("/v1/minkan", &session).await;
    assert_eq!(response.body["minkan"], json!({ "doc": "X" }));
    assert_eq!(response.body["version"], 2);
}

#[tokio::test]
async fn test_stale_write_conflicts() {
    let app = TestApp::new();
    let session = app.login("carol").await;

    let first = app
        .send(
            "PUT",
            "/v1/minkan",
            Some(json!({ "minkan": { "doc": "X" }, "version": 1 })),
            &session,
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);

    // Another tab still holds version 1.
    let stale = app
        .send(
            "PUT",
            "/v1/minkan",
            Some(json!({ "minkan": { "doc": "Y" }, "version": 1 })),
            &session,
        )
        .await;
    assert_eq!(stale.status, StatusCode::CONFLICT);
    assert_eq!(stale.body["error"], "VERSION_CONFLICT");

    // A version from the future is just as stale.
    let ahead = app
        .send(
            "PUT",
            "/v1/minkan",
            Some(json!({ "minkan": { "doc": "Z" }, "version": 7 })),
            &session,
        )
        .await;
    assert_eq!(ahead.status, StatusCode::CONFLICT);

    let response = app.get("/v1/minkan", &session).await;
    assert_eq!(response.body["minkan"], json!({ "doc": "X" }));
    assert_eq!(response.body["version"], 2);

    // Re-read then retry succeeds.
    let retry = app
        .send(
            "PUT",
            "/v1/minkan",
            Some(json!({ "minkan": { "doc": "Y" }, "version": 2 })),
            &session,
        )
        .await;
    assert_eq!(retry.status, StatusCode::OK);
    assert_eq!(retry.body["version"], 3);
}

#[tokio::test]
async fn test_document_key_alias() {
    let app = TestApp::new();
    let session = app.login("dave").await;

    let response = app
        .send(
            "PUT",
            "/v1/minkan",
            Some(json!({ "document": { "from": "alias" }, "version": 1 })),
            &session,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let response = app.get("/v1/minkan", &session).await;
    assert_eq!(response.body["minkan"]["from"], "alias");
}

#[tokio::test]
async fn test_invalid_bodies() {
    let app = TestApp::new();
    let session = app.login("erin").await;

    let response = app
        .send(
            "PUT",
            "/v1/minkan",
            Some(json!({ "minkan": {}, "version": 0 })),
            &session,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    let response = app
        .send("PUT", "/v1/minkan", Some(json!({ "version": 1 })), &session)
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.get("/v1/minkan", &session).await;
    assert_eq!(response.body["version"], 1);
}

#[tokio::test]
async fn test_documents_are_per_user() {
    let app = TestApp::new();
    let alice = app.login("alice").await;
    let bob = app.login("bob").await;

    let response = app
        .send(
            "PUT",
            "/v1/minkan",
            Some(json!({ "minkan": { "owner": "alice" }, "version": 1 })),
            &alice,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.get("/v1/minkan", &bob).await;
    assert_eq!(response.body["version"], 1);
    assert!(response.body["minkan"]["owner"].is_null());
}

#[tokio::test]
async fn test_relogin_keeps_document() {
    let app = TestApp::new();
    let first = app.login("frank").await;

    app.send(
        "PUT",
        "/v1/minkan",
        Some(json!({ "minkan": { "kept": true }, "version": 1 })),
        &first,
    )
    .await;

    let second = app.login("frank").await;
    assert_ne!(first.session_id, second.session_id);

    let response = app.get("/v1/minkan", &second).await;
    assert_eq!(response.body["minkan"]["kept"], true);
    assert_eq!(response.body["version"], 2);
}

#[tokio::test]
async fn test_deleted_account_has_no_document() {
    let app = TestApp::new();
    let first = app.login("hank").await;
    let second = app.login("hank").await;

    let response = app.send("DELETE", "/v1/users/me", None, &second).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    // `first` still resolves to the deleted user.
    let response = app.get("/v1/minkan", &first).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");

    let response = app
        .send(
            "PUT",
            "/v1/minkan",
            Some(json!({ "minkan": { "doc": "X" }, "version": 1 })),
            &first,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

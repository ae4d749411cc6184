//! Shared test helpers for integration tests.
//!
//! The app runs on in-memory storage with a stub identity provider, so the
//! whole login flow can be driven through the router.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use minkan_api::AppState;
use minkan_auth::{
    AuthorizationRequest, IdentityProvider, ManualClock, SessionStore, VerifiedIdentity,
};
use minkan_core::AppResult;
use minkan_core::config::AppConfig;
use minkan_core::error::AppError;
use minkan_database::MemoryStore;

pub const ISSUER: &str = "https://issuer.test";

/// Identity provider that trusts the authorization code as the subject.
#[derive(Default)]
pub struct StubProvider {
    issued: Mutex<HashSet<String>>,
    counter: Mutex<u64>,
}

#[async_trait]
impl IdentityProvider for StubProvider {
    async fn authorization_request(&self) -> AppResult<AuthorizationRequest> {
        let state = {
            let mut counter = self.counter.lock().unwrap();
            *counter += 1;
            format!("state-{}", *counter)
        };
        self.issued.lock().unwrap().insert(state.clone());
        Ok(AuthorizationRequest {
            url: format!("{ISSUER}/authorize?state={state}"),
            state,
        })
    }

    async fn exchange(&self, code: &str, state: &str) -> AppResult<VerifiedIdentity> {
        if !self.issued.lock().unwrap().remove(state) {
            return Err(AppError::authentication("Unknown or expired login state"));
        }
        Ok(VerifiedIdentity {
            issuer: ISSUER.to_string(),
            subject: code.to_string(),
            display_name: format!("User {code}"),
            email: format!("{code}@example.com"),
            email_verified: true,
        })
    }
}

/// Cookies handed out by a completed login.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub csrf_token: String,
}

impl Session {
    pub fn cookie_header(&self) -> String {
        format!("session_id={}; csrf_token={}", self.session_id, self.csrf_token)
    }
}

/// Test application context
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let sessions = SessionStore::from_config(&config.session);
        Self::with_sessions(config, sessions)
    }

    /// Sessions expire against `clock` instead of the wall clock.
    pub fn with_clock(clock: Arc<ManualClock>) -> Self {
        let config = AppConfig::default();
        let sessions = SessionStore::with_clock(config.session.ttl(), clock);
        Self::with_sessions(config, sessions)
    }

    fn with_sessions(config: AppConfig, sessions: SessionStore) -> Self {
        let store = MemoryStore::new();
        let state = AppState::with_sessions(
            config,
            sessions,
            Arc::new(StubProvider::default()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        );
        let router = minkan_api::build_router(state.clone());
        Self {
            router,
            state,
            store,
        }
    }

    /// Drive `/v1/auth/login` and `/v1/auth/callback` for `subject`.
    pub async fn login(&self, subject: &str) -> Session {
        let start = self.request("GET", "/v1/auth/login", None, &[]).await;
        assert_eq!(start.status, StatusCode::SEE_OTHER, "login did not redirect");
        let state = start
            .cookie("oidc_state")
            .expect("login must set the state cookie");

        let callback = self
            .request(
                "GET",
                &format!("/v1/auth/callback?code={subject}&state={state}"),
                None,
                &[(COOKIE.as_str(), &format!("oidc_state={state}"))],
            )
            .await;
        assert_eq!(
            callback.status,
            StatusCode::SEE_OTHER,
            "callback failed: {:?}",
            callback.body
        );

        Session {
            session_id: callback.cookie("session_id").expect("no session cookie"),
            csrf_token: callback.cookie("csrf_token").expect("no csrf cookie"),
        }
    }

    /// GET with the session cookies.
    pub async fn get(&self, path: &str, session: &Session) -> TestResponse {
        self.request("GET", path, None, &[(COOKIE.as_str(), &session.cookie_header())])
            .await
    }

    /// State-changing request with the session cookies and a matching
    /// CSRF header.
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        session: &Session,
    ) -> TestResponse {
        self.request(
            method,
            path,
            body,
            &[
                (COOKIE.as_str(), &session.cookie_header()),
                ("x-csrf-token", &session.csrf_token),
            ],
        )
        .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when the body is empty or not JSON
    pub body: Value,
}

impl TestResponse {
    /// Raw `Set-Cookie` line for `name`.
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&prefix))
            .map(str::to_string)
    }

    /// Value of the cookie `name` set by this response.
    pub fn cookie(&self, name: &str) -> Option<String> {
        let line = self.set_cookie(name)?;
        let pair = line.split(';').next()?;
        let (_, value) = pair.split_once('=')?;
        Some(value.to_string())
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }
}

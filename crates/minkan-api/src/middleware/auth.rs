//! Session and CSRF gate.
//!
//! Every request passes through [`require_session`] before routing. The gate
//! lets `OPTIONS` and configured path prefixes through untouched, resolves
//! the `session_id` cookie against the [`SessionStore`], enforces the
//! double-submit CSRF check on state-changing methods, and attaches a
//! [`RequestContext`] for downstream handlers.

use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use minkan_auth::SessionStore;
use minkan_auth::csrf::{CSRF_HEADER, verify_double_submit};
use minkan_core::config::SessionConfig;

use crate::context::RequestContext;
use crate::cookies::{self, CSRF_COOKIE, SESSION_COOKIE};

/// Why the gate refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Missing, unknown, or expired session.
    Unauthorized,
    /// Session is fine but the CSRF pair is missing or mismatched.
    CsrfInvalid,
}

impl Rejection {
    pub fn status(self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::CsrfInvalid => StatusCode::FORBIDDEN,
        }
    }
}

/// Builds the response for a rejected request.
pub type RejectHandler = Arc<dyn Fn(Rejection) -> Response + Send + Sync>;

/// Minimal `text/plain` bodies.
pub fn plain_rejection(rejection: Rejection) -> Response {
    let body = match rejection {
        Rejection::Unauthorized => "unauthorized",
        Rejection::CsrfInvalid => "csrf invalid",
    };
    (rejection.status(), body).into_response()
}

/// Gate settings plus the store it consults.
#[derive(Clone)]
pub struct AuthGate {
    sessions: SessionStore,
    skip_paths: Arc<[String]>,
    require_csrf: bool,
    on_reject: RejectHandler,
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("skip_paths", &self.skip_paths)
            .field("require_csrf", &self.require_csrf)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(sessions: SessionStore, config: &SessionConfig) -> Self {
        Self {
            sessions,
            skip_paths: config.skip_paths.clone().into(),
            require_csrf: config.require_csrf,
            on_reject: Arc::new(plain_rejection),
        }
    }

    /// Replace the default plain-text rejection responses.
    pub fn with_reject_handler(mut self, on_reject: RejectHandler) -> Self {
        self.on_reject = on_reject;
        self
    }

    fn is_skipped(&self, path: &str) -> bool {
        self.skip_paths.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Decide what to do with a request.
    ///
    /// `Ok(None)` means the request bypasses the gate, `Ok(Some(ctx))` that it
    /// is authenticated as `ctx`.
    pub async fn authorize(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<Option<RequestContext>, Rejection> {
        if method == Method::OPTIONS || self.is_skipped(path) {
            return Ok(None);
        }

        let jar = CookieJar::from_headers(headers);
        let token = cookies::value(&jar, SESSION_COOKIE).ok_or(Rejection::Unauthorized)?;

        let user_id = self
            .sessions
            .get(token)
            .await
            .filter(|id| id.is_valid())
            .ok_or(Rejection::Unauthorized)?;

        if self.require_csrf && !is_safe_method(method) {
            let header = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());
            if !verify_double_submit(header, cookies::value(&jar, CSRF_COOKIE)) {
                return Err(Rejection::CsrfInvalid);
            }
        }

        Ok(Some(RequestContext::new(user_id, token)))
    }
}

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Axum middleware wrapping [`AuthGate::authorize`].
pub async fn require_session(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let decision = gate
        .authorize(request.method(), request.uri().path(), request.headers())
        .await;

    match decision {
        Ok(None) => next.run(request).await,
        Ok(Some(ctx)) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(rejection) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                ?rejection,
                "Request rejected by session gate"
            );
            (gate.on_reject)(rejection)
        }
    }
}

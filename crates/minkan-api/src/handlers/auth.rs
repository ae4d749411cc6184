//! Auth handlers: login redirect, provider callback, logout.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;
use chrono::Duration;
use tracing::warn;

use minkan_auth::csrf::CSRF_HEADER;
use minkan_core::error::AppError;

use crate::cookies::{self, CSRF_COOKIE, SESSION_COOKIE, STATE_COOKIE};
use crate::dto::request::CallbackQuery;
use crate::dto::response::LogoutResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Redirect)> {
    let request = state.login.begin().await?;

    let state_ttl = Duration::from_std(state.config.oidc.state_ttl()).unwrap_or(Duration::MAX);
    let jar = jar.add(cookies::state_cookie(
        request.state,
        state_ttl,
        state.config.session.cookie_secure,
    ));

    Ok((jar, Redirect::to(&request.url)))
}

/// GET /v1/auth/callback
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<(CookieJar, Redirect)> {
    if let Some(error) = query.error.as_deref() {
        warn!(error = %error, "Identity provider returned an error");
        return Err(AppError::authentication("Login was not completed").into());
    }

    let (Some(code), Some(returned_state)) = (query.code.as_deref(), query.state.as_deref())
    else {
        return Err(AppError::authentication("Missing code or state").into());
    };

    // The state must come back to the same browser that started the login.
    if cookies::value(&jar, STATE_COOKIE) != Some(returned_state) {
        warn!("Callback state does not match the login cookie");
        return Err(AppError::authentication("Login state mismatch").into());
    }

    let established = state.login.complete(code, returned_state).await?;

    let secure = state.config.session.cookie_secure;
    let jar = cookies::without_state(jar, secure);
    let jar = cookies::with_session(
        jar,
        established.session_token,
        established.csrf_token,
        established.max_age,
        secure,
    );

    Ok((jar, Redirect::to(&established.redirect_to)))
}

/// POST /v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> ApiResult<(CookieJar, Json<LogoutResponse>)> {
    let csrf_header = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());

    state
        .login
        .logout(
            cookies::value(&jar, SESSION_COOKIE),
            csrf_header,
            cookies::value(&jar, CSRF_COOKIE),
        )
        .await?;

    let jar = cookies::without_session(jar, state.config.session.cookie_secure);
    Ok((
        jar,
        Json(LogoutResponse {
            message: "logged out".to_string(),
            redirect_to: state.config.login.redirect_after_logout.clone(),
        }),
    ))
}

//! Account handlers for the signed-in user.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use minkan_core::error::AppError;

use crate::cookies;
use crate::dto::response::UserResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /v1/users/me
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /v1/users/me
///
/// Removes the account and its document, ends the current session and
/// expires both cookies.
pub async fn delete_me(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> ApiResult<(StatusCode, CookieJar)> {
    let deleted = state.users.delete(auth.user_id).await?;
    state.sessions.delete(&auth.session_token).await;

    info!(user_id = %auth.user_id, deleted, "Account deleted");

    let jar = cookies::without_session(jar, state.config.session.cookie_secure);
    Ok((StatusCode::NO_CONTENT, jar))
}

//! Versioned mind-map/kanban document handlers.

use axum::Json;
use axum::extract::State;
use tracing::{debug, info};
use validator::Validate;

use minkan_core::error::AppError;
use minkan_entity::WriteOutcome;

use crate::dto::request::PutMinkanRequest;
use crate::dto::response::{MinkanResponse, VersionResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /v1/minkan
pub async fn get_minkan(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MinkanResponse>> {
    let record = state.documents.read(auth.user_id).await?;

    Ok(Json(MinkanResponse {
        minkan: record.payload,
        version: record.version,
    }))
}

/// PUT /v1/minkan
pub async fn put_minkan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<PutMinkanRequest>,
) -> ApiResult<Json<VersionResponse>> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))?;

    let outcome = state
        .documents
        .write(auth.user_id, &req.minkan, req.version)
        .await?;

    match outcome {
        WriteOutcome::Updated { version } => {
            debug!(user_id = %auth.user_id, version, "Document saved");
            Ok(Json(VersionResponse { version }))
        }
        WriteOutcome::Conflict { current_version } => {
            info!(
                user_id = %auth.user_id,
                expected = req.version,
                current = current_version,
                "Version conflict"
            );
            Err(AppError::conflict(format!(
                "version conflict: expected {}, current is {current_version}",
                req.version
            ))
            .into())
        }
        WriteOutcome::NotFound => Err(AppError::not_found("No document for this user").into()),
    }
}

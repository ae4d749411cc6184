//! Health check handler.

use axum::Json;

use crate::dto::response::MessageResponse;

/// GET /healthz
pub async fn healthz() -> Json<MessageResponse> {
    Json(MessageResponse::new("health check OK"))
}

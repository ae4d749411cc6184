//! Route definitions for the Mind-Kanban HTTP API.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Layers from the inside out: session gate, body limit, compression, CORS,
/// tracing, request logging, panic recovery. CORS sits outside the gate so
/// preflights and rejections still carry CORS headers.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(user_routes())
        .merge(minkan_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.gate.clone(),
            middleware::auth::require_session,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .layer(middleware::recovery::recovery_layer())
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/healthz", get(handlers::health::healthz))
}

/// Login redirect, provider callback, logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/login", get(handlers::auth::login))
        .route("/v1/auth/callback", get(handlers::auth::callback))
        .route("/v1/auth/logout", post(handlers::auth::logout))
}

fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/v1/users/me",
        get(handlers::users::get_me).delete(handlers::users::delete_me),
    )
}

/// The signed-in user's document
fn minkan_routes() -> Router<AppState> {
    Router::new().route(
        "/v1/minkan",
        get(handlers::minkan::get_minkan).put(handlers::minkan::put_minkan),
    )
}

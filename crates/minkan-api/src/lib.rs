//! # minkan-api
//!
//! HTTP API layer for the Mind-Kanban backend built on Axum.
//!
//! Provides the REST endpoints, the session/CSRF gate, cookie handling,
//! request logging, panic recovery, and the mapping from [`AppError`]
//! kinds to HTTP status codes.
//!
//! [`AppError`]: minkan_core::AppError

pub mod app;
pub mod context;
pub mod cookies;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_state;
pub use context::RequestContext;
pub use router::build_router;
pub use state::AppState;

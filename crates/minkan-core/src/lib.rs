//! # minkan-core
//!
//! Core crate for the Mind-Kanban backend. Contains configuration schemas,
//! typed identifiers, and the unified error system shared by every other
//! crate in the workspace.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use types::UserId;

//! Convenience result type alias.

use crate::error::AppError;

/// A specialized `Result` type used across the workspace.
pub type AppResult<T> = Result<T, AppError>;

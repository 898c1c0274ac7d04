//! Convenience result type alias for ShareHub.

use crate::error::AppError;

/// A specialized `Result` type for ShareHub operations.
pub type AppResult<T> = Result<T, AppError>;

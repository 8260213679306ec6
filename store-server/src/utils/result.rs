//! Unified result type

use super::error::AppError;

/// Result type for application-level operations
pub type AppResult<T> = Result<T, AppError>;

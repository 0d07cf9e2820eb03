//! Convenience result type alias for shopkit.

use crate::error::AppError;

/// A specialized `Result` type for shopkit operations.
pub type AppResult<T> = Result<T, AppError>;

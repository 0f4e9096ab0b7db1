//! Service errors

use subtrack_db::DbError;
use subtrack_types::ValidationError;
use thiserror::Error;

/// Result alias for service operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Service errors
#[derive(Error, Debug)]
pub enum CoreError {
    /// Request rejected before touching storage
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Subscription not found
    #[error("subscription not found")]
    NotFound,

    /// Another subscription already uses this service name for the user
    #[error("subscription already exists")]
    AlreadyExists,

    /// Storage rejected the values (e.g. end not after start)
    #[error("subscription violates storage constraints: {0}")]
    ConstraintViolation(String),

    /// Any other storage failure
    #[error("storage error: {0}")]
    Storage(#[source] DbError),
}

impl CoreError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => Self::NotFound,
            DbError::AlreadyExists => Self::AlreadyExists,
            DbError::ConstraintViolation { message, .. } => Self::ConstraintViolation(message),
            DbError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

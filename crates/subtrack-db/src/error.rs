//! Database errors

use subtrack_types::ValidationError;
use thiserror::Error;

/// Result alias for storage operations
pub type DbResult<T> = Result<T, DbError>;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Unique key (service name, user id) already taken
    #[error("record already exists")]
    AlreadyExists,

    /// A check constraint or column domain rejected the values
    #[error("{op}: constraint violation: {message}")]
    ConstraintViolation { op: &'static str, message: String },

    /// Caller supplied an invalid argument (e.g. unpaired pagination)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A stored row could not be decoded into the domain model
    #[error("{op}: corrupt row: {reason}")]
    CorruptRow { op: &'static str, reason: String },

    /// Connection attempts exhausted during startup
    #[error("connection attempts exhausted after {attempts} tries: {source}")]
    ConnectExhausted {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    /// Any other SQLx error
    #[error("{op}: database error: {source}")]
    Sqlx {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    /// Translate a driver error into the storage taxonomy
    pub fn from_sqlx(op: &'static str, err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return Self::NotFound;
        }

        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return Self::AlreadyExists;
            }
            // Postgres class 22 (data exception) covers dates like month 13
            let bad_pg_value = db
                .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                .is_some_and(|pg| pg.code().starts_with("22"));
            if db.is_check_violation() || bad_pg_value {
                return Self::ConstraintViolation {
                    op,
                    message: db.message().to_string(),
                };
            }
        }

        Self::Sqlx { op, source: err }
    }

    pub(crate) fn corrupt(op: &'static str, field: &str, err: impl std::fmt::Display) -> Self {
        Self::CorruptRow {
            op,
            reason: format!("{field}: {err}"),
        }
    }
}

/// Map-and-log adapter for `map_err` on driver calls.
///
/// Rejections caused by the caller's data are logged at debug level,
/// everything else at error level with the operation name.
pub(crate) fn sqlx_err(op: &'static str) -> impl FnOnce(sqlx::Error) -> DbError {
    move |err| {
        let err = DbError::from_sqlx(op, err);
        match err {
            DbError::NotFound | DbError::AlreadyExists | DbError::ConstraintViolation { .. } => {
                tracing::debug!(op, error = %err, "storage operation rejected");
            }
            _ => tracing::error!(op, error = %err, "storage operation failed"),
        }
        err
    }
}

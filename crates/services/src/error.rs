use lexcase_core::error::CoreError;

/// Application-level error type for the service layer.
///
/// Wraps [`CoreError`] for domain errors and adds infrastructure variants.
/// Database unique-constraint violations are classified into
/// [`CoreError::Conflict`] at conversion time so callers only ever see
/// domain errors for expected failure modes.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A domain-level error from `lexcase_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for service return values.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        classify_sqlx_error(err)
    }
}

/// Classify a sqlx error into a [`ServiceError`].
///
/// - Unique constraint violations (constraint name starting with `uq_`)
///   become [`CoreError::Conflict`].
/// - Everything else is wrapped as [`ServiceError::Database`].
fn classify_sqlx_error(err: sqlx::Error) -> ServiceError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return ServiceError::Core(CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                )));
            }
        }
    }
    ServiceError::Database(err)
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Core(CoreError::Validation(err.to_string()))
    }
}

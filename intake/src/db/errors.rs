use thiserror::Error;

/// Unified error type for submission store operations, whichever backend serves them
#[derive(Error, Debug)]
pub enum DbError {
    /// Check constraint violation (the table rejected the row's values)
    #[error("Check constraint violation")]
    CheckViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// The store could not be reached, or the transport failed mid-request
    #[error("Store request failed: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The store answered, but refused the request
    #[error("Store rejected request with status {status}")]
    Rejected { status: u16, body: String },

    /// The store answered successfully with something we cannot interpret
    #[error("Invalid store response: {reason}")]
    InvalidResponse { reason: String },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convert from sqlx::Error using proper sqlx error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => DbError::CheckViolation {
                constraint: db_err.constraint().map(|s| s.to_string()),
                table: db_err.table().map(|s| s.to_string()),
                message: db_err.message().to_string(),
            },
            // All other sqlx errors are non-recoverable - convert to anyhow with context
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Type alias for store operation results
pub type Result<T> = std::result::Result<T, DbError>;

use thiserror::Error;

/// Errors that can occur when talking to the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A column held a value that does not fit the row type.
    #[error("Invalid value in column {column}: {reason}")]
    Decode { column: &'static str, reason: String },

    /// The store could not be reached.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

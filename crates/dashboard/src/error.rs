//! Dashboard error types.

use thiserror::Error;

/// Errors that can occur while polling the ledger.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The ledger read failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger::LedgerError),
}

/// Result type for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

//! Domain error types.

use common::ProductId;
use ledger::LedgerError;
use thiserror::Error;

/// Errors raised by the inventory service.
///
/// Business outcomes such as insufficient stock are not errors; they come
/// back as [`crate::ConsumptionResult::Rejected`].
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The ledger statement failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// More than one ledger row carries the same product ID.
    #[error("Integrity fault: {rows} inventory rows found for product_id {product_id}")]
    DuplicateProduct { product_id: ProductId, rows: usize },

    /// Consumption requests must be for at least one unit.
    #[error("Invalid consume count for {product_id}: {count} (must be greater than 0)")]
    InvalidCount { product_id: ProductId, count: u32 },
}

/// Errors raised by the cart service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The session has no cart yet; it must be cleared (initialized) first.
    #[error("Cart has not been initialized for this session")]
    NotInitialized,
}

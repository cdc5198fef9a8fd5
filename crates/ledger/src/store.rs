use async_trait::async_trait;

use crate::{InventoryRow, ProductId, Result};

/// Core trait for ledger implementations.
///
/// All parameters are bound by the implementation; nothing is ever
/// interpolated into statement text. Implementations must be thread-safe
/// because consumption calls are fanned out across tasks.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Returns every row of the inventory relation.
    async fn read_all(&self) -> Result<Vec<InventoryRow>>;

    /// Returns every row whose `product_id` matches.
    ///
    /// The expected cardinality is zero or one. More than one row is an
    /// integrity problem that the caller must report.
    async fn read_one(&self, product_id: &ProductId) -> Result<Vec<InventoryRow>>;

    /// Decrements `product_count` by `count` for rows matching `product_id`
    /// whose `product_count >= count`, as one atomic statement.
    ///
    /// Returns the number of rows affected.
    async fn update_conditional(&self, product_id: &ProductId, count: u32) -> Result<u64>;
}

//! Thin client over the durable inventory ledger.
//!
//! The ledger exposes exactly three parameterized statements:
//! - a full scan of the inventory relation
//! - a point lookup by `product_id` (zero, one or many rows)
//! - a conditional decrement guarded by `product_count >= count`
//!
//! Nothing here retries or interprets results; callers decide what an
//! affected-row count or a multi-row lookup means.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod row;
pub mod store;

pub use common::ProductId;
pub use error::{LedgerError, Result};
pub use memory::InMemoryLedger;
pub use postgres::PostgresLedger;
pub use row::InventoryRow;
pub use store::Ledger;

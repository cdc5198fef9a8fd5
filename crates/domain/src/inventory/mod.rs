//! Inventory items and the service that keeps the shared snapshot in step
//! with the ledger.

mod item;
mod service;

pub use item::{ConsumptionResult, InventoryItem, RejectionReason};
pub use service::InventoryService;

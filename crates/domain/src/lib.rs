//! Domain layer for the event planner.
//!
//! This crate owns the two scoped state stores and the only two services
//! allowed to write them:
//! - [`SharedState`] holds the process-wide inventory snapshot, written by
//!   [`InventoryService`]
//! - [`SessionState`] holds the per-session cart, written by [`CartService`]
//!
//! Mutators on the stores are crate-private, so code outside this crate can
//! read them but has to go through a service to change them.

pub mod cart;
pub mod error;
pub mod inventory;
pub mod state;

pub use cart::{CartLine, CartService, effective_lines};
pub use common::ProductId;
pub use error::{CartError, InventoryError};
pub use inventory::{ConsumptionResult, InventoryItem, InventoryService, RejectionReason};
pub use state::{InventorySnapshot, SessionState, SharedState};

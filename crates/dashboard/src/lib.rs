//! Read-only inventory dashboard.
//!
//! A [`DashboardPoller`] reads the whole ledger on a fixed interval and
//! publishes the first rows to an [`InventoryBoard`], which renders them as
//! a plain-text table. Nothing here writes to the ledger or to any session
//! state; the board sits outside the orchestration protocol.

pub mod board;
pub mod error;
pub mod poller;

pub use board::{Board, BoardRow, InventoryBoard};
pub use error::{DashboardError, Result};
pub use poller::{DashboardConfig, DashboardPoller};

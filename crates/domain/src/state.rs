//! Scoped state stores.
//!
//! Two independent regions with different lifetimes:
//!
//! ```text
//! SharedState   process lifetime, every session   inventory snapshot
//! SessionState  one end-user session              cart
//! ```
//!
//! Both are replaced wholesale by their owning service and never merged
//! field by field.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use common::ProductId;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::cart::{CartLine, effective_lines};
use crate::inventory::InventoryItem;

/// Cached copy of the whole inventory as of the last successful refresh.
///
/// An empty snapshot means "not loaded yet" and must be refreshed before it
/// is relied on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventorySnapshot {
    items: Vec<InventoryItem>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl InventorySnapshot {
    /// Returns the cached items in ledger order.
    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    /// Returns true if no refresh has populated the snapshot.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// When the snapshot was last replaced.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Looks up a cached item by product ID.
    pub fn get(&self, product_id: &ProductId) -> Option<&InventoryItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Returns true if the snapshot is empty or older than `max_age` at `now`.
    pub fn is_stale(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        match self.refreshed_at {
            _ if self.items.is_empty() => true,
            Some(at) => now - at > max_age,
            None => true,
        }
    }
}

/// Process-wide state shared by every session.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inventory: Arc<RwLock<InventorySnapshot>>,
}

impl SharedState {
    /// Creates an empty shared region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current inventory snapshot.
    pub async fn inventory(&self) -> InventorySnapshot {
        self.inventory.read().await.clone()
    }

    /// Returns true if an inventory snapshot has been loaded.
    pub async fn has_inventory(&self) -> bool {
        !self.inventory.read().await.is_empty()
    }

    /// Replaces the whole snapshot. Last writer wins.
    pub(crate) async fn replace_inventory(&self, items: Vec<InventoryItem>, at: DateTime<Utc>) {
        *self.inventory.write().await = InventorySnapshot {
            items,
            refreshed_at: Some(at),
        };
    }
}

/// State private to one end-user session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    cart: Option<Vec<CartLine>>,
}

impl SessionState {
    /// Creates a session with no cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw cart lines, or `None` if the cart was never initialized.
    pub fn cart(&self) -> Option<&[CartLine]> {
        self.cart.as_deref()
    }

    /// Returns true if the cart has been initialized (it may still be empty).
    pub fn has_cart(&self) -> bool {
        self.cart.is_some()
    }

    /// Returns the effective cart: one line per product carrying its most
    /// recently written count, zero-count lines excluded.
    pub fn effective_cart(&self) -> Vec<CartLine> {
        self.cart.as_deref().map(effective_lines).unwrap_or_default()
    }

    pub(crate) fn replace_cart(&mut self, lines: Vec<CartLine>) {
        self.cart = Some(lines);
    }

    pub(crate) fn cart_mut(&mut self) -> Option<&mut Vec<CartLine>> {
        self.cart.as_mut()
    }
}

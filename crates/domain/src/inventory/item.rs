use common::ProductId;
use ledger::InventoryRow;
use serde::{Deserialize, Serialize};

/// A consumable item available for events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub description: String,
    /// Image URL or object-store reference.
    pub image: String,
    pub product_count: u32,
}

impl InventoryItem {
    /// Creates an item with empty description and image.
    pub fn new(product_id: impl Into<ProductId>, product_name: impl Into<String>, count: u32) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            description: String::new(),
            image: String::new(),
            product_count: count,
        }
    }
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        Self {
            product_id: row.product_id,
            product_name: row.product_name,
            description: row.product_description,
            image: row.product_image,
            product_count: row.product_count,
        }
    }
}

/// Why a conditional decrement did not apply.
///
/// The decrement itself cannot tell these apart; the label comes from a
/// follow-up read and is only as current as that read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    NotFound,
    InsufficientStock { available: u32 },
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::NotFound => write!(f, "not found"),
            RejectionReason::InsufficientStock { available } => {
                write!(f, "insufficient stock ({available} available)")
            }
        }
    }
}

/// Outcome of one `consume` call that reached the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConsumptionResult {
    /// Exactly one row was decremented; carries the re-read post-state.
    Consumed { item: InventoryItem, consumed: u32 },
    /// Exactly one row was decremented but the post-state could not be read
    /// back. The stock is gone all the same.
    Unconfirmed {
        product_id: ProductId,
        consumed: u32,
        detail: String,
    },
    /// No row was decremented.
    Rejected {
        product_id: ProductId,
        requested: u32,
        reason: RejectionReason,
    },
}

impl ConsumptionResult {
    /// Returns true if stock was decremented.
    pub fn is_consumed(&self) -> bool {
        self.consumed() > 0
    }

    /// Units decremented by this call.
    pub fn consumed(&self) -> u32 {
        match self {
            ConsumptionResult::Consumed { consumed, .. } | ConsumptionResult::Unconfirmed { consumed, .. } => *consumed,
            ConsumptionResult::Rejected { .. } => 0,
        }
    }

    /// The product this result is about.
    pub fn product_id(&self) -> &ProductId {
        match self {
            ConsumptionResult::Consumed { item, .. } => &item.product_id,
            ConsumptionResult::Unconfirmed { product_id, .. } | ConsumptionResult::Rejected { product_id, .. } => {
                product_id
            }
        }
    }
}

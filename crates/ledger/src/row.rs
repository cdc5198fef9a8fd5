use common::ProductId;
use serde::{Deserialize, Serialize};

/// One row of the inventory relation, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_description: String,
    /// Image URL or object-store reference.
    pub product_image: String,
    pub product_count: u32,
}

impl InventoryRow {
    /// Creates a row with empty description and image.
    pub fn new(product_id: impl Into<ProductId>, product_name: impl Into<String>, count: u32) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            product_description: String::new(),
            product_image: String::new(),
            product_count: count,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.product_description = description.into();
        self
    }

    /// Sets the image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.product_image = image.into();
        self
    }
}

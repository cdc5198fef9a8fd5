use common::ProductId;
use serde::{Deserialize, Serialize};

/// One appended cart entry. A count of zero marks the product as removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub count: u32,
}

impl CartLine {
    /// Creates a new cart line.
    pub fn new(product_id: impl Into<ProductId>, count: u32) -> Self {
        Self {
            product_id: product_id.into(),
            count,
        }
    }
}

/// Collapses raw cart lines to one line per product.
///
/// The most recently appended line for a product wins. Products whose
/// winning count is zero are dropped. Output keeps the order in which each
/// product first appeared.
pub fn effective_lines(lines: &[CartLine]) -> Vec<CartLine> {
    let mut effective: Vec<CartLine> = Vec::new();
    for line in lines {
        match effective.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => existing.count = line.count,
            None => effective.push(line.clone()),
        }
    }
    effective.retain(|l| l.count > 0);
    effective
}

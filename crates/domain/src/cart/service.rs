//! Cart service: the only writer of the session cart.

use common::ProductId;

use crate::error::CartError;
use crate::state::SessionState;

use super::CartLine;

/// Mutates the cart held in a [`SessionState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CartService;

impl CartService {
    /// Creates a new cart service.
    pub fn new() -> Self {
        Self
    }

    /// Replaces the cart with an empty one. Also initializes an absent cart.
    #[tracing::instrument(skip(self, session))]
    pub fn clear(&self, session: &mut SessionState) {
        session.replace_cart(Vec::new());
        metrics::counter!("cart_cleared_total").increment(1);
    }

    /// Appends a line for `product_id`. Earlier lines for the same product
    /// stay in place; the newest one decides the effective count.
    #[tracing::instrument(skip(self, session))]
    pub fn add_or_update(
        &self,
        session: &mut SessionState,
        product_id: ProductId,
        count: u32,
    ) -> Result<(), CartError> {
        let cart = session.cart_mut().ok_or(CartError::NotInitialized)?;
        cart.push(CartLine::new(product_id, count));
        metrics::counter!("cart_lines_appended_total").increment(1);
        Ok(())
    }
}

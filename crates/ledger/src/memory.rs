use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{InventoryRow, LedgerError, ProductId, Result, store::Ledger};

/// In-memory ledger implementation for testing and local runs.
///
/// Rows live in insertion order and duplicate `product_id`s are allowed so
/// integrity faults can be reproduced. The conditional update runs under
/// the write lock, which gives it the same all-or-nothing behaviour as the
/// SQL statement in [`crate::PostgresLedger`].
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    rows: Arc<RwLock<Vec<InventoryRow>>>,
    update_calls: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryLedger {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger holding the given rows.
    pub fn with_rows(rows: impl IntoIterator<Item = InventoryRow>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows.into_iter().collect())),
            ..Self::default()
        }
    }

    /// Creates a ledger holding the stock used by the local server.
    pub fn seeded() -> Self {
        Self::with_rows(seed_rows())
    }

    /// Appends a row without checking for an existing `product_id`.
    pub async fn insert(&self, row: InventoryRow) {
        self.rows.write().await.push(row);
    }

    /// Removes every row for a product.
    pub async fn remove(&self, product_id: &ProductId) {
        self.rows
            .write()
            .await
            .retain(|row| &row.product_id != product_id);
    }

    /// Returns the count of the first row for a product.
    pub async fn count_of(&self, product_id: &ProductId) -> Option<u32> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| &row.product_id == product_id)
            .map(|row| row.product_count)
    }

    /// Returns how many conditional updates have been issued.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent statement fail with [`LedgerError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable(
                "in-memory ledger is switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn read_all(&self) -> Result<Vec<InventoryRow>> {
        self.check_available()?;
        Ok(self.rows.read().await.clone())
    }

    async fn read_one(&self, product_id: &ProductId) -> Result<Vec<InventoryRow>> {
        self.check_available()?;
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|row| &row.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn update_conditional(&self, product_id: &ProductId, count: u32) -> Result<u64> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut rows = self.rows.write().await;
        let mut affected = 0;
        for row in rows
            .iter_mut()
            .filter(|row| &row.product_id == product_id && row.product_count >= count)
        {
            row.product_count -= count;
            affected += 1;
        }
        Ok(affected)
    }
}

/// Stock loaded by [`InMemoryLedger::seeded`]; mirrors `002_seed_inventory.sql`.
pub fn seed_rows() -> Vec<InventoryRow> {
    vec![
        InventoryRow::new("BANNER-01", "Roll-up banner", 12)
            .with_description("Two metre branded roll-up banner with carry case")
            .with_image("gs://event-assets/banner-01.png"),
        InventoryRow::new("CHAIR-01", "Folding chair", 120)
            .with_description("Padded folding chair, black")
            .with_image("gs://event-assets/chair-01.png"),
        InventoryRow::new("MUG-01", "Logo mug", 200)
            .with_description("Ceramic mug with the company logo")
            .with_image("gs://event-assets/mug-01.png"),
        InventoryRow::new("PROJ-01", "Projector", 4)
            .with_description("Full HD projector with HDMI and wireless casting")
            .with_image("gs://event-assets/proj-01.png"),
        InventoryRow::new("TSHIRT-01", "Event t-shirt", 80)
            .with_description("Cotton t-shirt, assorted sizes")
            .with_image("gs://event-assets/tshirt-01.png"),
    ]
}

//! Inventory service: the only writer of the shared inventory snapshot.

use chrono::Utc;
use common::ProductId;
use ledger::Ledger;

use crate::error::InventoryError;
use crate::state::SharedState;

use super::{ConsumptionResult, InventoryItem, RejectionReason};

/// Reads and consumes inventory through the ledger.
///
/// `refresh_all` is the only path that writes the shared snapshot; point
/// reads and consumption always go to the ledger and never touch the cache.
#[derive(Clone)]
pub struct InventoryService<L: Ledger> {
    ledger: L,
    shared: SharedState,
}

impl<L: Ledger> InventoryService<L> {
    /// Creates a new inventory service over the given ledger and shared region.
    pub fn new(ledger: L, shared: SharedState) -> Self {
        Self { ledger, shared }
    }

    /// Returns the underlying ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Returns the shared region this service writes.
    pub fn shared(&self) -> &SharedState {
        &self.shared
    }

    /// Reads every row and replaces the cached snapshot with it.
    ///
    /// Returns the number of items now cached. On failure the previous
    /// snapshot is left untouched.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_all(&self) -> Result<usize, InventoryError> {
        metrics::counter!("inventory_refresh_total").increment(1);
        let rows = self.ledger.read_all().await.inspect_err(|e| {
            metrics::counter!("inventory_refresh_failed_total").increment(1);
            tracing::warn!(error = %e, "inventory refresh failed");
        })?;

        let items: Vec<InventoryItem> = rows.into_iter().map(InventoryItem::from).collect();
        let count = items.len();
        self.shared.replace_inventory(items, Utc::now()).await;

        tracing::info!(items = count, "inventory snapshot replaced");
        Ok(count)
    }

    /// Reads a single item straight from the ledger.
    ///
    /// Zero rows is `Ok(None)`. More than one row is an integrity fault and is
    /// never resolved by picking one.
    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_one(&self, product_id: &ProductId) -> Result<Option<InventoryItem>, InventoryError> {
        let mut rows = self.ledger.read_one(product_id).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop().map(InventoryItem::from)),
            n => {
                metrics::counter!("inventory_integrity_faults_total").increment(1);
                tracing::error!(%product_id, rows = n, "duplicate inventory rows");
                Err(InventoryError::DuplicateProduct {
                    product_id: product_id.clone(),
                    rows: n,
                })
            }
        }
    }

    /// Consumes `count` units with a single conditional decrement, then
    /// re-reads the item for its post-decrement state.
    ///
    /// The floor at zero is enforced by the ledger statement alone, so any
    /// number of concurrent calls for the same product is safe.
    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    pub async fn consume(&self, product_id: &ProductId, count: u32) -> Result<ConsumptionResult, InventoryError> {
        if count == 0 {
            return Err(InventoryError::InvalidCount {
                product_id: product_id.clone(),
                count,
            });
        }

        metrics::counter!("inventory_consume_total").increment(1);
        let affected = self.ledger.update_conditional(product_id, count).await?;

        match affected {
            // The decrement is committed; a failed re-read must not hide it.
            1 => match self.get_one(product_id).await {
                Ok(Some(item)) => {
                    tracing::info!(consumed = count, remaining = item.product_count, "inventory consumed");
                    Ok(ConsumptionResult::Consumed {
                        item,
                        consumed: count,
                    })
                }
                Ok(None) => Ok(unconfirmed(product_id, count, "row missing after decrement".to_string())),
                Err(e) => Ok(unconfirmed(product_id, count, e.to_string())),
            },
            0 => {
                metrics::counter!("inventory_consume_rejected_total").increment(1);
                // Diagnostic only: the decrement has already been decided.
                let reason = match self.get_one(product_id).await? {
                    None => RejectionReason::NotFound,
                    Some(item) => RejectionReason::InsufficientStock {
                        available: item.product_count,
                    },
                };
                tracing::info!(requested = count, %reason, "inventory consume rejected");
                Ok(ConsumptionResult::Rejected {
                    product_id: product_id.clone(),
                    requested: count,
                    reason,
                })
            }
            n => {
                metrics::counter!("inventory_integrity_faults_total").increment(1);
                tracing::error!(%product_id, rows = n, "conditional decrement hit duplicate rows");
                Err(InventoryError::DuplicateProduct {
                    product_id: product_id.clone(),
                    rows: n as usize,
                })
            }
        }
    }
}

fn unconfirmed(product_id: &ProductId, count: u32, detail: String) -> ConsumptionResult {
    metrics::counter!("inventory_consume_unconfirmed_total").increment(1);
    tracing::warn!(%product_id, consumed = count, %detail, "inventory consumed but post-state unreadable");
    ConsumptionResult::Unconfirmed {
        product_id: product_id.clone(),
        consumed: count,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger::{InMemoryLedger, InventoryRow, LedgerError};

    fn pid(s: &str) -> ProductId {
        ProductId::new(s)
    }

    fn service_with(rows: Vec<InventoryRow>) -> (InventoryService<InMemoryLedger>, InMemoryLedger) {
        let ledger = InMemoryLedger::with_rows(rows);
        (InventoryService::new(ledger.clone(), SharedState::new()), ledger)
    }

    #[tokio::test]
    async fn test_refresh_all_populates_snapshot() {
        let (service, _) = service_with(vec![
            InventoryRow::new("A", "Ay", 10).with_description("first"),
            InventoryRow::new("B", "Bee", 4),
        ]);

        let count = service.refresh_all().await.unwrap();

        assert_eq!(count, 2);
        let snapshot = service.shared().inventory().await;
        assert_eq!(snapshot.items().len(), 2);
        assert_eq!(snapshot.get(&pid("A")).unwrap().description, "first");
        assert!(snapshot.refreshed_at().is_some());
    }

    #[tokio::test]
    async fn test_refresh_all_drops_entries_missing_from_ledger() {
        let (service, ledger) = service_with(vec![
            InventoryRow::new("A", "Ay", 10),
            InventoryRow::new("B", "Bee", 4),
        ]);
        service.refresh_all().await.unwrap();

        ledger.remove(&pid("B")).await;
        service.refresh_all().await.unwrap();

        let snapshot = service.shared().inventory().await;
        assert_eq!(snapshot.items(), &[InventoryItem::new("A", "Ay", 10)]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let (service, ledger) = service_with(vec![InventoryRow::new("A", "Ay", 10)]);
        service.refresh_all().await.unwrap();

        ledger.set_unavailable(true);
        let result = service.refresh_all().await;

        assert!(matches!(
            result,
            Err(InventoryError::Ledger(LedgerError::Unavailable(_)))
        ));
        assert_eq!(service.shared().inventory().await.items().len(), 1);
    }

    #[tokio::test]
    async fn test_get_one_cardinality() {
        let (service, ledger) = service_with(vec![InventoryRow::new("A", "Ay", 10)]);
        ledger.insert(InventoryRow::new("X", "Ex", 1)).await;
        ledger.insert(InventoryRow::new("X", "Ex two", 2)).await;

        assert_eq!(service.get_one(&pid("A")).await.unwrap().unwrap().product_count, 10);
        assert!(service.get_one(&pid("missing")).await.unwrap().is_none());
        assert!(matches!(
            service.get_one(&pid("X")).await,
            Err(InventoryError::DuplicateProduct { rows: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_get_one_bypasses_cache() {
        let (service, ledger) = service_with(vec![InventoryRow::new("A", "Ay", 10)]);
        service.refresh_all().await.unwrap();
        ledger.update_conditional(&pid("A"), 3).await.unwrap();

        assert_eq!(service.get_one(&pid("A")).await.unwrap().unwrap().product_count, 7);
        let cached = service.shared().inventory().await;
        assert_eq!(cached.get(&pid("A")).unwrap().product_count, 10);
    }

    #[tokio::test]
    async fn test_consume_success_returns_post_state() {
        let (service, _) = service_with(vec![InventoryRow::new("A", "Ay", 10)]);

        let result = service.consume(&pid("A"), 4).await.unwrap();

        match result {
            ConsumptionResult::Consumed { item, consumed } => {
                assert_eq!(item.product_count, 6);
                assert_eq!(consumed, 4);
            }
            other => panic!("expected consumed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_consume_more_than_available_leaves_count() {
        let (service, ledger) = service_with(vec![InventoryRow::new("A", "Ay", 3)]);

        let result = service.consume(&pid("A"), 5).await.unwrap();

        assert_eq!(
            result,
            ConsumptionResult::Rejected {
                product_id: pid("A"),
                requested: 5,
                reason: RejectionReason::InsufficientStock { available: 3 },
            }
        );
        assert_eq!(ledger.count_of(&pid("A")).await, Some(3));
    }

    #[tokio::test]
    async fn test_consume_unknown_product() {
        let (service, _) = service_with(vec![]);

        let result = service.consume(&pid("ghost"), 1).await.unwrap();

        assert!(matches!(
            result,
            ConsumptionResult::Rejected {
                reason: RejectionReason::NotFound,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_consume_zero_is_invalid() {
        let (service, ledger) = service_with(vec![InventoryRow::new("A", "Ay", 3)]);

        assert!(matches!(
            service.consume(&pid("A"), 0).await,
            Err(InventoryError::InvalidCount { count: 0, .. })
        ));
        assert_eq!(ledger.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_consume_duplicate_rows_is_integrity_fault() {
        let (service, ledger) = service_with(vec![InventoryRow::new("X", "Ex", 5)]);
        ledger.insert(InventoryRow::new("X", "Ex two", 5)).await;

        assert!(matches!(
            service.consume(&pid("X"), 1).await,
            Err(InventoryError::DuplicateProduct { rows: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_consume_does_not_touch_cache() {
        let (service, _) = service_with(vec![InventoryRow::new("A", "Ay", 10)]);
        service.refresh_all().await.unwrap();

        service.consume(&pid("A"), 2).await.unwrap();

        let cached = service.shared().inventory().await;
        assert_eq!(cached.get(&pid("A")).unwrap().product_count, 10);
    }

    #[tokio::test]
    async fn test_consume_surfaces_ledger_fault() {
        let (service, ledger) = service_with(vec![InventoryRow::new("A", "Ay", 10)]);
        ledger.set_unavailable(true);

        assert!(matches!(
            service.consume(&pid("A"), 1).await,
            Err(InventoryError::Ledger(_))
        ));
    }

    /// Decrements through the wrapped ledger but cannot read rows back.
    struct UnreadableLedger(InMemoryLedger);

    #[async_trait::async_trait]
    impl Ledger for UnreadableLedger {
        async fn read_all(&self) -> ledger::Result<Vec<InventoryRow>> {
            self.0.read_all().await
        }

        async fn read_one(&self, _product_id: &ProductId) -> ledger::Result<Vec<InventoryRow>> {
            Err(LedgerError::Unavailable("read path down".to_string()))
        }

        async fn update_conditional(&self, product_id: &ProductId, count: u32) -> ledger::Result<u64> {
            self.0.update_conditional(product_id, count).await
        }
    }

    #[tokio::test]
    async fn test_consume_with_failed_reread_still_counts_as_consumed() {
        let inner = InMemoryLedger::with_rows(vec![InventoryRow::new("A", "Ay", 10)]);
        let service = InventoryService::new(UnreadableLedger(inner.clone()), SharedState::new());

        let result = service.consume(&pid("A"), 4).await.unwrap();

        assert!(matches!(
            &result,
            ConsumptionResult::Unconfirmed { product_id, consumed: 4, .. } if product_id == &pid("A")
        ));
        assert!(result.is_consumed());
        assert_eq!(inner.count_of(&pid("A")).await, Some(6));
    }
}

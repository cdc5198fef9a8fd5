//! Summary of one event run.

use common::ProductId;
use domain::{ConsumptionResult, InventoryError};
use serde::Serialize;

use crate::fan_out::BatchError;

/// A cart line whose stock was consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumedLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub consumed: u32,
    /// `None` when the decrement landed but the row could not be re-read.
    pub remaining: Option<u32>,
}

/// A cart line that could not be consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedLine {
    pub product_id: ProductId,
    pub requested: u32,
    pub reason: String,
}

/// What happened when the event ran.
///
/// Consumption is not transactional across lines, so a report may hold
/// both consumed and failed lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventReport {
    pub consumed: Vec<ConsumedLine>,
    pub failed: Vec<FailedLine>,
    /// Set if the post-run inventory refresh failed.
    pub refresh_error: Option<String>,
}

impl EventReport {
    /// Records the outcome of one consumption call.
    pub fn record(
        &mut self,
        product_id: &ProductId,
        requested: u32,
        outcome: Result<Result<ConsumptionResult, InventoryError>, BatchError>,
    ) {
        match outcome {
            Ok(Ok(ConsumptionResult::Consumed { item, consumed })) => {
                self.consumed.push(ConsumedLine {
                    product_id: item.product_id,
                    product_name: item.product_name,
                    consumed,
                    remaining: Some(item.product_count),
                });
            }
            Ok(Ok(ConsumptionResult::Unconfirmed { product_id, consumed, .. })) => {
                self.consumed.push(ConsumedLine {
                    product_name: product_id.to_string(),
                    product_id,
                    consumed,
                    remaining: None,
                });
            }
            Ok(Ok(ConsumptionResult::Rejected { reason, .. })) => self.fail(product_id, requested, reason.to_string()),
            Ok(Err(e)) => self.fail(product_id, requested, e.to_string()),
            Err(e) => self.fail(product_id, requested, e.to_string()),
        }
    }

    fn fail(&mut self, product_id: &ProductId, requested: u32, reason: String) {
        self.failed.push(FailedLine {
            product_id: product_id.clone(),
            requested,
            reason,
        });
    }

    /// Returns true if every line was consumed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl std::fmt::Display for EventReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.consumed.is_empty() {
            write!(f, "The event could not use any items.")?;
        } else {
            let used: Vec<String> = self
                .consumed
                .iter()
                .map(|l| match l.remaining {
                    Some(left) => format!("{} x {} ({left} left)", l.consumed, l.product_name),
                    None => format!("{} x {} (remaining unknown)", l.consumed, l.product_name),
                })
                .collect();
            write!(f, "The event ran using {}.", used.join(", "))?;
        }

        if !self.failed.is_empty() {
            let failed: Vec<String> = self
                .failed
                .iter()
                .map(|l| format!("{} x {} ({})", l.requested, l.product_id, l.reason))
                .collect();
            write!(f, " These items could not be used: {}.", failed.join(", "))?;
        }

        if let Some(error) = &self.refresh_error {
            write!(f, " The inventory could not be refreshed afterwards: {error}.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{InventoryItem, RejectionReason};

    fn pid(s: &str) -> ProductId {
        ProductId::new(s)
    }

    #[test]
    fn test_record_partial_run() {
        let mut report = EventReport::default();
        report.record(
            &pid("A"),
            2,
            Ok(Ok(ConsumptionResult::Consumed {
                item: InventoryItem::new("A", "Apple crate", 8),
                consumed: 2,
            })),
        );
        report.record(
            &pid("B"),
            5,
            Ok(Ok(ConsumptionResult::Rejected {
                product_id: pid("B"),
                requested: 5,
                reason: RejectionReason::InsufficientStock { available: 3 },
            })),
        );
        report.record(&pid("C"), 1, Err(BatchError::Cancelled));

        assert!(!report.is_complete());
        assert_eq!(report.consumed.len(), 1);
        assert_eq!(report.failed.len(), 2);
        assert_eq!(
            report.to_string(),
            "The event ran using 2 x Apple crate (8 left). These items could not be used: \
             5 x B (insufficient stock (3 available)), 1 x C (Batch member was cancelled)."
        );
    }

    #[test]
    fn test_unconfirmed_consumption_counts_as_consumed() {
        let mut report = EventReport::default();
        report.record(
            &pid("A"),
            4,
            Ok(Ok(ConsumptionResult::Unconfirmed {
                product_id: pid("A"),
                consumed: 4,
                detail: "Ledger unavailable: read path down".to_string(),
            })),
        );

        assert!(report.is_complete());
        assert_eq!(
            report.consumed,
            vec![ConsumedLine {
                product_id: pid("A"),
                product_name: "A".to_string(),
                consumed: 4,
                remaining: None,
            }]
        );
        assert_eq!(report.to_string(), "The event ran using 4 x A (remaining unknown).");
    }

    #[test]
    fn test_refresh_error_is_reported() {
        let report = EventReport {
            refresh_error: Some("Ledger unavailable: down".to_string()),
            ..EventReport::default()
        };
        assert!(report.to_string().ends_with(
            "The inventory could not be refreshed afterwards: Ledger unavailable: down."
        ));
    }
}

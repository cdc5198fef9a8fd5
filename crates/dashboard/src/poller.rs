//! Fixed-interval poller feeding the board from the ledger.

use std::time::Duration;

use chrono::Utc;
use ledger::Ledger;
use tokio::time::MissedTickBehavior;

use crate::Result;
use crate::board::InventoryBoard;

/// Polling cadence.
#[derive(Debug, Clone, Copy)]
pub struct DashboardConfig {
    pub interval: Duration,
    /// Number of polls before the poller stops.
    pub max_refreshes: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_refreshes: 1000,
        }
    }
}

/// Reads the ledger on a timer and publishes the result to a board.
pub struct DashboardPoller<L: Ledger> {
    ledger: L,
    board: InventoryBoard,
    config: DashboardConfig,
}

impl<L: Ledger> DashboardPoller<L> {
    /// Creates a poller publishing to `board`.
    pub fn new(ledger: L, board: InventoryBoard, config: DashboardConfig) -> Self {
        Self { ledger, board, config }
    }

    pub fn board(&self) -> &InventoryBoard {
        &self.board
    }

    /// Polls once. Returns the number of rows the ledger holds.
    #[tracing::instrument(skip(self))]
    pub async fn poll_once(&self) -> Result<usize> {
        metrics::counter!("dashboard_polls_total").increment(1);
        match self.ledger.read_all().await {
            Ok(rows) => {
                self.board.apply(&rows, Utc::now()).await;
                tracing::debug!(rows = rows.len(), "dashboard refreshed");
                Ok(rows.len())
            }
            Err(e) => {
                metrics::counter!("dashboard_poll_failures_total").increment(1);
                tracing::warn!(error = %e, "dashboard poll failed");
                self.board.record_failure(e.to_string()).await;
                Err(e.into())
            }
        }
    }

    /// Polls until `max_refreshes` polls have been made, failed ones
    /// included. The first poll happens immediately.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_ms = self.config.interval.as_millis() as u64,
            max_refreshes = self.config.max_refreshes,
            "dashboard poller started"
        );
        for _ in 0..self.config.max_refreshes {
            ticker.tick().await;
            // Failures are already logged and recorded on the board.
            let _ = self.poll_once().await;
        }
        tracing::info!("dashboard poller finished");
    }
}

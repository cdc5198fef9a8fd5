//! Board read model: the latest polled rows and their rendering.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ledger::InventoryRow;
use serde::Serialize;
use tokio::sync::RwLock;

/// Rows shown on the board.
pub const BOARD_ROWS: usize = 10;

const NAME_HEADER: &str = "product_name";
const COUNT_HEADER: &str = "product_count";

/// One displayed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardRow {
    pub product_name: String,
    pub product_count: u32,
}

impl From<&InventoryRow> for BoardRow {
    fn from(row: &InventoryRow) -> Self {
        Self {
            product_name: row.product_name.clone(),
            product_count: row.product_count,
        }
    }
}

/// A point-in-time copy of the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Board {
    pub rows: Vec<BoardRow>,
    /// Successful polls so far.
    pub refreshes: u64,
    pub polled_at: Option<DateTime<Utc>>,
    /// Error from the most recent poll, cleared by the next success.
    pub last_error: Option<String>,
}

impl Board {
    /// Renders the board as a plain-text table.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(polled_at) = self.polled_at else {
            return writeln!(f, "No inventory polled yet.");
        };

        writeln!(
            f,
            "Refresh #{} at {}",
            self.refreshes,
            polled_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;

        let name_width = self
            .rows
            .iter()
            .map(|r| r.product_name.chars().count())
            .chain(std::iter::once(NAME_HEADER.len()))
            .max()
            .unwrap_or(NAME_HEADER.len());
        let count_width = COUNT_HEADER.len();

        writeln!(f, "{NAME_HEADER:<name_width$} | {COUNT_HEADER:>count_width$}")?;
        writeln!(f, "{}-+-{}", "-".repeat(name_width), "-".repeat(count_width))?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<name_width$} | {:>count_width$}",
                row.product_name, row.product_count
            )?;
        }

        if let Some(error) = &self.last_error {
            writeln!(f, "Last poll failed: {error}")?;
        }
        Ok(())
    }
}

/// Shared handle to the current board.
#[derive(Debug, Clone, Default)]
pub struct InventoryBoard {
    state: Arc<RwLock<Board>>,
}

impl InventoryBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current board.
    pub async fn snapshot(&self) -> Board {
        self.state.read().await.clone()
    }

    /// Renders the current board.
    pub async fn render(&self) -> String {
        self.state.read().await.render()
    }

    /// Replaces the rows with the first [`BOARD_ROWS`] of `rows`.
    pub(crate) async fn apply(&self, rows: &[InventoryRow], at: DateTime<Utc>) {
        let mut board = self.state.write().await;
        board.rows = rows.iter().take(BOARD_ROWS).map(BoardRow::from).collect();
        board.refreshes += 1;
        board.polled_at = Some(at);
        board.last_error = None;
    }

    /// Notes a failed poll; the previous rows stay visible.
    pub(crate) async fn record_failure(&self, error: String) {
        self.state.write().await.last_error = Some(error);
    }
}

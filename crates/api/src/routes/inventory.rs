//! Shared inventory snapshot endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::InventorySnapshot;
use ledger::Ledger;
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct RefreshResponse {
    pub items: usize,
}

/// GET /inventory: the cached snapshot, as last refreshed.
pub async fn get<L: Ledger + Clone + 'static>(State(state): State<Arc<AppState<L>>>) -> Json<InventorySnapshot> {
    Json(state.orchestrator.inventory().shared().inventory().await)
}

/// POST /inventory/refresh: replace the snapshot from the ledger.
#[tracing::instrument(skip(state))]
pub async fn refresh<L: Ledger + Clone + 'static>(
    State(state): State<Arc<AppState<L>>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    metrics::counter!("api_inventory_refreshes_total").increment(1);
    let items = state.orchestrator.inventory().refresh_all().await?;
    Ok(Json(RefreshResponse { items }))
}

//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use ledger::Ledger;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sessions: usize,
    /// Items in the cached inventory snapshot.
    pub inventory_items: usize,
}

/// GET /health: liveness plus a few cheap counters. Never touches the ledger.
pub async fn check<L: Ledger + Clone + 'static>(State(state): State<Arc<AppState<L>>>) -> Json<HealthResponse> {
    let snapshot = state.orchestrator.inventory().shared().inventory().await;
    Json(HealthResponse {
        status: "ok",
        sessions: state.orchestrator.sessions().len().await,
        inventory_items: snapshot.items().len(),
    })
}

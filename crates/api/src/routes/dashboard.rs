//! Dashboard board endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use ledger::Ledger;

use crate::AppState;

/// GET /dashboard: the latest polled board as a plain-text table.
pub async fn get<L: Ledger + Clone + 'static>(State(state): State<Arc<AppState<L>>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.board.render().await,
    )
}

//! HTTP API server with observability for event planning sessions.
//!
//! Exposes the role delegation protocol over REST: sessions are created,
//! messages run one turn each, and the shared inventory snapshot and the
//! dashboard board can be read directly. Structured logging goes through
//! tracing and metrics are exported for Prometheus.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use dashboard::{DashboardPoller, InventoryBoard};
use domain::{InventoryService, SharedState};
use ledger::Ledger;
use metrics_exporter_prometheus::PrometheusHandle;
use orchestration::{KeywordPlanner, Orchestrator};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState<L: Ledger> {
    pub orchestrator: Orchestrator<L, KeywordPlanner>,
    pub board: InventoryBoard,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<L: Ledger + Clone + 'static>(state: Arc<AppState<L>>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<L>))
        .route("/sessions", post(routes::sessions::create::<L>))
        .route("/sessions/{id}", get(routes::sessions::get::<L>))
        .route("/sessions/{id}/messages", post(routes::sessions::message::<L>))
        .route("/inventory", get(routes::inventory::get::<L>))
        .route("/inventory/refresh", post(routes::inventory::refresh::<L>))
        .route("/dashboard", get(routes::dashboard::get::<L>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the services over `ledger` and returns the state together with
/// the dashboard poller that feeds its board. The poller is not started.
pub fn create_default_state<L: Ledger + Clone + 'static>(
    ledger: L,
    config: &Config,
) -> (Arc<AppState<L>>, DashboardPoller<L>) {
    let inventory = InventoryService::new(ledger.clone(), SharedState::new());
    let orchestrator = Orchestrator::new(inventory, KeywordPlanner::new(), config.orchestrator());

    let board = InventoryBoard::new();
    let poller = DashboardPoller::new(ledger, board.clone(), config.dashboard());

    let state = Arc::new(AppState { orchestrator, board });
    (state, poller)
}

//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::InventoryError;
use orchestration::OrchestratorError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// A turn was aborted.
    Orchestrator(OrchestratorError),
    /// Inventory service error outside a turn.
    Inventory(InventoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Orchestrator(err) => orchestrator_error_to_response(err),
            ApiError::Inventory(err) => inventory_error_to_response(err),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        }
        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn orchestrator_error_to_response(err: OrchestratorError) -> (StatusCode, String) {
    match err {
        OrchestratorError::SessionNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        OrchestratorError::EmptyInventory => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
        OrchestratorError::Inventory(inner) => inventory_error_to_response(inner),
        OrchestratorError::IllegalDelegation { .. }
        | OrchestratorError::MayNotRespond(_)
        | OrchestratorError::IllegalDecision { .. }
        | OrchestratorError::DelegationLimit(_)
        | OrchestratorError::ToolRoundLimit(_)
        | OrchestratorError::Planner(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
        OrchestratorError::Cart(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

fn inventory_error_to_response(err: InventoryError) -> (StatusCode, String) {
    match &err {
        InventoryError::Ledger(_) => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
        InventoryError::InvalidCount { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        InventoryError::DuplicateProduct { .. } => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        ApiError::Orchestrator(err)
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        ApiError::Inventory(err)
    }
}

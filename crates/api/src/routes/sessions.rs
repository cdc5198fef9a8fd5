//! Session endpoints: create, send a message, inspect.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::SessionId;
use domain::CartLine;
use ledger::Ledger;
use orchestration::{EventReport, Role, Turn};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: SessionId,
    pub active_role: Role,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
    pub active_role: Role,
    pub greeted: bool,
    /// Effective cart; `None` until the cart is first initialized.
    pub cart: Option<Vec<CartLine>>,
    pub last_report: Option<EventReport>,
}

fn parse_id(id: &str) -> Result<SessionId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid session id: {e}")))
}

// -- Handlers --

/// POST /sessions: start a new session at the root role.
#[tracing::instrument(skip(state))]
pub async fn create<L: Ledger + Clone + 'static>(
    State(state): State<Arc<AppState<L>>>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let session_id = state.orchestrator.sessions().create().await;
    metrics::counter!("api_sessions_created_total").increment(1);
    tracing::info!(%session_id, "session created");
    (
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id,
            active_role: Role::Root,
        }),
    )
}

/// POST /sessions/{id}/messages: run one turn for the session.
#[tracing::instrument(skip(state, req))]
pub async fn message<L: Ledger + Clone + 'static>(
    State(state): State<Arc<AppState<L>>>,
    Path(id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<Turn>, ApiError> {
    let session_id = parse_id(&id)?;
    if req.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Message text must not be empty".to_string()));
    }

    let result = state.orchestrator.handle_message(session_id, req.text).await;
    let outcome = if result.is_ok() { "ok" } else { "error" };
    metrics::counter!("api_messages_total", "outcome" => outcome).increment(1);
    Ok(Json(result?))
}

/// GET /sessions/{id}: active role and effective cart.
#[tracing::instrument(skip(state))]
pub async fn get<L: Ledger + Clone + 'static>(
    State(state): State<Arc<AppState<L>>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = parse_id(&id)?;
    let handle = state
        .orchestrator
        .sessions()
        .get(session_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {session_id}")))?;

    let session = handle.lock().await;
    let cart = session.state().has_cart().then(|| session.state().effective_cart());
    Ok(Json(SessionResponse {
        session_id,
        active_role: session.active_role(),
        greeted: session.greeted(),
        cart,
        last_report: session.last_report().cloned(),
    }))
}

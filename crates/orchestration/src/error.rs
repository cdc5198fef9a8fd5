//! Orchestration error types.

use common::SessionId;
use domain::{CartError, InventoryError};
use thiserror::Error;

use crate::role::Role;

/// Failure reported by a planner implementation.
#[derive(Debug, Error)]
#[error("Planner error: {0}")]
pub struct PlannerError(pub String);

/// Errors that can abort a session turn.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// No session with this ID exists.
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// A role tried to hand control to a role it may not address.
    #[error("Illegal delegation from {from} to {to}")]
    IllegalDelegation { from: Role, to: Role },

    /// A role tried to answer the end user directly.
    #[error("{0} may not respond to the user")]
    MayNotRespond(Role),

    /// The planner returned a decision the deciding role may not act on.
    #[error("Illegal decision for {role}: {decision}")]
    IllegalDecision { role: Role, decision: String },

    /// A single turn exceeded the delegation hop limit.
    #[error("Delegation limit of {0} hops exceeded")]
    DelegationLimit(usize),

    /// The planner kept requesting tools without ever replying.
    #[error("Tool round limit of {0} exceeded")]
    ToolRoundLimit(usize),

    /// The ledger holds no inventory at all, so nothing can be suggested.
    #[error("Inventory is empty after refresh")]
    EmptyInventory,

    /// Inventory service error.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Cart service error.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Planner error.
    #[error(transparent)]
    Planner(#[from] PlannerError),
}

/// Convenience type alias for orchestration results.
pub type Result<T> = std::result::Result<T, OrchestratorError>;

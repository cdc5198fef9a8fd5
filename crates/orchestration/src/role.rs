//! The fixed set of orchestration roles and what each may do.

use serde::{Deserialize, Serialize};

use crate::planner::ToolCall;

/// One of the four cooperating roles.
///
/// Delegation targets:
/// ```text
/// Root        ──► Suggestion, Checkout
/// Suggestion  ──► Inventory, Checkout
/// Checkout    ──► Root, Inventory, Suggestion
/// Inventory   ──► (returns to caller only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Entry point. Greets once, then only routes.
    #[default]
    Root,

    /// Builds the cart with the user.
    Suggestion,

    /// Runs the event from the cart.
    Checkout,

    /// Agent-facing wrapper of the inventory service.
    Inventory,
}

impl Role {
    /// Returns true if this role may hand control to `to`.
    pub fn may_delegate_to(&self, to: Role) -> bool {
        matches!(
            (self, to),
            (Role::Root, Role::Suggestion | Role::Checkout)
                | (Role::Suggestion, Role::Inventory | Role::Checkout)
                | (Role::Checkout, Role::Root | Role::Inventory | Role::Suggestion)
        )
    }

    /// Returns true if this role may produce end-user-visible text.
    ///
    /// Root's one-shot greeting is handled separately and does not count.
    pub fn may_respond(&self) -> bool {
        matches!(self, Role::Suggestion | Role::Checkout)
    }

    /// Returns true if a planner deciding for this role may request `call`.
    pub fn may_call(&self, call: &ToolCall) -> bool {
        match self {
            Role::Suggestion => matches!(
                call,
                ToolCall::AddToCart { .. } | ToolCall::ClearCart | ToolCall::LookupItem { .. }
            ),
            Role::Root | Role::Checkout | Role::Inventory => false,
        }
    }

    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Root => "root",
            Role::Suggestion => "suggestion",
            Role::Checkout => "checkout",
            Role::Inventory => "inventory",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

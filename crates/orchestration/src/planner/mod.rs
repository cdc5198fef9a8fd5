//! Boundary to the reasoning engine that decides what a role says or calls.
//!
//! The orchestrator only relies on the legal shapes of a [`Decision`]; how
//! a planner arrives at one is its own business. Every decision is checked
//! against the deciding role's capabilities before it is acted on.

mod keyword;

use async_trait::async_trait;
use common::ProductId;
use domain::{CartLine, InventorySnapshot};
use serde::Serialize;

use crate::error::PlannerError;
use crate::protocol::Instruction;
use crate::report::EventReport;
use crate::role::Role;

pub use keyword::KeywordPlanner;

/// A tool a planner may ask its role to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolCall {
    /// Append a cart line. A count of zero removes the product.
    AddToCart { product_id: ProductId, count: u32 },
    /// Reset the cart to empty.
    ClearCart,
    /// Read one item straight from the ledger.
    LookupItem { product_id: ProductId },
}

impl ToolCall {
    /// Tool name as exposed to planners.
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::AddToCart { .. } => "add_to_cart",
            ToolCall::ClearCart => "clear_cart",
            ToolCall::LookupItem { .. } => "lookup_item",
        }
    }
}

/// Result of running one [`ToolCall`], fed back on the next decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResult {
    pub call: ToolCall,
    pub ok: bool,
    pub detail: String,
}

/// Everything a planner sees when deciding for a role.
#[derive(Debug, Clone, Copy)]
pub struct PlannerContext<'a> {
    pub role: Role,
    pub instruction: &'a Instruction,
    /// Shared-scope inventory as of the last refresh.
    pub inventory: &'a InventorySnapshot,
    /// Effective cart lines for the session.
    pub cart: &'a [CartLine],
    /// Results of tools run earlier in this decision loop.
    pub tool_results: &'a [ToolResult],
    /// Report of the most recent event run in this session.
    pub last_report: Option<&'a EventReport>,
}

/// The legal shapes of a planner answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Answer the end user.
    Reply(String),
    /// Run these tools, then decide again with their results.
    Tools(Vec<ToolCall>),
    /// Hand control to another role.
    Transfer { to: Role, instruction: String },
}

impl Decision {
    /// Short label used in errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Reply(_) => "reply",
            Decision::Tools(_) => "tools",
            Decision::Transfer { .. } => "transfer",
        }
    }
}

/// A reasoning engine that chooses what a role does next.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Decides the next step for `context.role`.
    async fn decide(&self, context: &PlannerContext<'_>) -> Result<Decision, PlannerError>;
}

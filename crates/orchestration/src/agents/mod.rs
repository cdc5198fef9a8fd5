//! Role handlers.
//!
//! Each role is a single async function from an instruction to an
//! [`Outcome`](crate::protocol::Outcome). Handlers never move control
//! themselves; the coordinator validates and applies whatever they return.

pub(crate) mod checkout;
pub(crate) mod inventory;
pub(crate) mod root;
pub(crate) mod suggestion;

use ledger::Ledger;

use crate::coordinator::Orchestrator;
use crate::error::{OrchestratorError, Result};
use crate::planner::{Decision, Planner, PlannerContext, ToolResult};
use crate::protocol::Instruction;
use crate::report::EventReport;
use crate::role::Role;
use crate::session::Session;

/// Scratch state carried across the hops of a single turn.
#[derive(Debug, Default)]
pub(crate) struct TurnContext {
    /// Role that just returned control, if the current hop is a resume.
    pub resumed_from: Option<Role>,
    /// Set by Inventory when its refresh failed; read by the resumed caller.
    pub refresh_error: Option<String>,
    /// Greeting to prepend to the final response.
    pub greeting: Option<String>,
    /// Report produced if the event ran during this turn.
    pub report: Option<EventReport>,
}

/// Asks the planner for `role`'s next step and rejects anything the role
/// may not do.
pub(crate) async fn decide<L, P>(
    orchestrator: &Orchestrator<L, P>,
    session: &Session,
    role: Role,
    instruction: &Instruction,
    tool_results: &[ToolResult],
) -> Result<Decision>
where
    L: Ledger + Clone + 'static,
    P: Planner,
{
    let inventory = orchestrator.inventory().shared().inventory().await;
    let cart = session.state().effective_cart();
    let context = PlannerContext {
        role,
        instruction,
        inventory: &inventory,
        cart: &cart,
        tool_results,
        last_report: session.last_report(),
    };

    let decision = orchestrator.planner().decide(&context).await?;
    let legal = match &decision {
        Decision::Reply(_) => role.may_respond(),
        Decision::Tools(calls) => !calls.is_empty() && calls.iter().all(|c| role.may_call(c)),
        Decision::Transfer { to, .. } => role.may_delegate_to(*to),
    };

    if legal {
        Ok(decision)
    } else {
        tracing::warn!(%role, decision = decision.kind(), "planner decision rejected");
        Err(illegal(role, &decision))
    }
}

pub(crate) fn illegal(role: Role, decision: &Decision) -> OrchestratorError {
    let decision = match decision {
        Decision::Reply(_) => "reply".to_string(),
        Decision::Tools(calls) => {
            let names: Vec<&str> = calls.iter().map(|c| c.name()).collect();
            format!("tools [{}]", names.join(", "))
        }
        Decision::Transfer { to, .. } => format!("transfer to {to}"),
    };
    OrchestratorError::IllegalDecision { role, decision }
}

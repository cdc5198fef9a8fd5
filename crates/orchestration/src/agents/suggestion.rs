//! Suggestion role: presents stock and edits the cart.

use domain::InventoryItem;
use ledger::Ledger;

use crate::coordinator::Orchestrator;
use crate::error::{OrchestratorError, Result};
use crate::planner::{Decision, Planner, ToolCall, ToolResult};
use crate::protocol::{Instruction, Outcome};
use crate::role::Role;
use crate::session::Session;

use super::{TurnContext, decide};

pub(crate) async fn handle<L, P>(
    orchestrator: &Orchestrator<L, P>,
    session: &mut Session,
    instruction: &Instruction,
    turn: &mut TurnContext,
) -> Result<Outcome>
where
    L: Ledger + Clone + 'static,
    P: Planner,
{
    if !session.state().has_cart() {
        orchestrator.cart().clear(session.state_mut());
    }

    if !orchestrator.inventory().shared().has_inventory().await {
        if turn.resumed_from == Some(Role::Inventory) {
            return match turn.refresh_error.take() {
                Some(error) => Ok(Outcome::Respond(format!(
                    "I can't reach the inventory right now ({error}). Please try again shortly."
                ))),
                None => Err(OrchestratorError::EmptyInventory),
            };
        }
        return Ok(Outcome::Delegate {
            to: Role::Inventory,
            instruction: Instruction::from_role(Role::Suggestion, "Load the current inventory."),
        });
    }

    let max_rounds = orchestrator.config().max_tool_rounds;
    let mut results: Vec<ToolResult> = Vec::new();

    let mut rounds = 0;

    loop {
        match decide(orchestrator, session, Role::Suggestion, instruction, &results).await? {
            Decision::Reply(text) => return Ok(Outcome::Respond(text)),
            Decision::Transfer { to, instruction: text } => {
                return Ok(Outcome::Delegate {
                    to,
                    instruction: Instruction::from_role(Role::Suggestion, text),
                });
            }
            Decision::Tools(calls) => {
                if rounds == max_rounds {
                    return Err(OrchestratorError::ToolRoundLimit(max_rounds));
                }
                rounds += 1;
                for call in calls {
                    let result = run_tool(orchestrator, session, call).await?;
                    results.push(result);
                }
            }
        }
    }
}

/// Runs one tool call. Ledger faults during a lookup are handed back to the
/// planner as a failed result; a cart fault aborts the turn.
#[tracing::instrument(skip(orchestrator, session), fields(tool = call.name()))]
async fn run_tool<L, P>(orchestrator: &Orchestrator<L, P>, session: &mut Session, call: ToolCall) -> Result<ToolResult>
where
    L: Ledger + Clone + 'static,
    P: Planner,
{
    metrics::counter!("orchestrator_tool_calls_total", "tool" => call.name()).increment(1);

    let (ok, detail) = match &call {
        ToolCall::AddToCart { product_id, count } => {
            orchestrator
                .cart()
                .add_or_update(session.state_mut(), product_id.clone(), *count)?;
            let snapshot = orchestrator.inventory().shared().inventory().await;
            let name = snapshot
                .get(product_id)
                .map(|item| item.product_name.clone())
                .unwrap_or_else(|| product_id.to_string());
            let detail = if *count == 0 {
                format!("Removed {name}")
            } else {
                format!("Set {name} to {count}")
            };
            (true, detail)
        }
        ToolCall::ClearCart => {
            orchestrator.cart().clear(session.state_mut());
            (true, "Cleared the cart".to_string())
        }
        ToolCall::LookupItem { product_id } => match orchestrator.inventory().get_one(product_id).await {
            Ok(Some(InventoryItem {
                product_name,
                product_count,
                ..
            })) => (true, format!("{product_name} has {product_count} available")),
            Ok(None) => (false, format!("There is no product {product_id}")),
            Err(e) => (false, format!("Could not look up {product_id}: {e}")),
        },
    };

    Ok(ToolResult { call, ok, detail })
}

//! Inventory role: refreshes the shared snapshot and hands control back.

use ledger::Ledger;

use crate::coordinator::Orchestrator;
use crate::error::Result;
use crate::planner::Planner;
use crate::protocol::{Instruction, Outcome};
use crate::role::Role;

use super::TurnContext;

/// A failed refresh is handed back to the caller rather than aborting the
/// turn; the previous snapshot stays in place.
pub(crate) async fn handle<L, P>(orchestrator: &Orchestrator<L, P>, turn: &mut TurnContext) -> Result<Outcome>
where
    L: Ledger + Clone + 'static,
    P: Planner,
{
    let text = match orchestrator.inventory().refresh_all().await {
        Ok(count) => {
            turn.refresh_error = None;
            format!("Inventory refreshed with {count} items.")
        }
        Err(e) => {
            tracing::warn!(error = %e, "inventory refresh failed");
            metrics::counter!("orchestrator_refresh_failures_total").increment(1);
            let text = format!("The inventory could not be refreshed: {e}.");
            turn.refresh_error = Some(e.to_string());
            text
        }
    };
    Ok(Outcome::Return(Instruction::from_role(Role::Inventory, text)))
}

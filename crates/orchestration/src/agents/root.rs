//! Root role: greets once per session and routes.

use ledger::Ledger;

use crate::coordinator::Orchestrator;
use crate::error::Result;
use crate::planner::{Decision, Planner};
use crate::protocol::{Instruction, Outcome};
use crate::role::Role;
use crate::session::Session;

use super::{TurnContext, decide, illegal};

/// Routes the instruction to Suggestion or Checkout, keeping its origin.
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
    // Marked greeted only once a response carrying the greeting goes out.
    if !session.greeted() {
        turn.greeting = Some(orchestrator.config().greeting.clone());
    }

    match decide(orchestrator, session, Role::Root, instruction, &[]).await? {
        Decision::Transfer { to, instruction: text } => Ok(Outcome::Delegate {
            to,
            instruction: Instruction {
                text,
                origin: instruction.origin,
            },
        }),
        other => Err(illegal(Role::Root, &other)),
    }
}

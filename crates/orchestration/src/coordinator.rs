//! Turn coordinator for the role delegation protocol.

use std::time::Instant;

use common::SessionId;
use domain::{CartService, InventoryService};
use ledger::Ledger;
use serde::Serialize;

use crate::agents::{self, TurnContext};
use crate::error::{OrchestratorError, Result};
use crate::planner::Planner;
use crate::protocol::{Instruction, Outcome, Transition};
use crate::report::EventReport;
use crate::role::Role;
use crate::session::{Session, SessionRegistry};

/// Greeting shown once, on the first response of a session.
pub const DEFAULT_GREETING: &str =
    "Hello! I can help you pick supplies for your event, build a cart, and run the event when you're ready.";

/// Tunables for the coordinator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum number of role transitions in one turn.
    pub max_hops: usize,
    /// Maximum tool rounds a role may run before it must reply or transfer.
    pub max_tool_rounds: usize,
    /// When set, Checkout skips its pre-run refresh if the snapshot is
    /// younger than this. `None` refreshes on every checkout.
    pub inventory_max_age: Option<chrono::Duration>,
    pub greeting: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_hops: 16,
            max_tool_rounds: 4,
            inventory_max_age: None,
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

/// The result of one end-user message.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub reply: String,
    /// Role that produced the reply and receives the next message.
    pub active_role: Role,
    pub transitions: Vec<Transition>,
    /// Present if the event ran during this turn.
    pub report: Option<EventReport>,
}

/// Drives sessions through the role delegation protocol.
///
/// Each turn starts at the session's active role. Roles answer with an
/// [`Outcome`]; the coordinator validates it against the capability table,
/// applies the transition, and stops at the first response.
pub struct Orchestrator<L, P>
where
    L: Ledger,
    P: Planner,
{
    inventory: InventoryService<L>,
    cart: CartService,
    planner: P,
    sessions: SessionRegistry,
    config: OrchestratorConfig,
}

impl<L, P> Orchestrator<L, P>
where
    L: Ledger + Clone + 'static,
    P: Planner,
{
    /// Creates a new orchestrator with an empty session registry.
    pub fn new(inventory: InventoryService<L>, planner: P, config: OrchestratorConfig) -> Self {
        Self {
            inventory,
            cart: CartService::new(),
            planner,
            sessions: SessionRegistry::new(),
            config,
        }
    }

    pub fn inventory(&self) -> &InventoryService<L> {
        &self.inventory
    }

    pub fn cart(&self) -> &CartService {
        &self.cart
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Handles one end-user message for an existing session.
    ///
    /// The session stays locked for the whole turn, so concurrent messages
    /// for the same session are processed one after the other.
    #[tracing::instrument(skip(self, text), fields(session_id = %session_id))]
    pub async fn handle_message(&self, session_id: SessionId, text: impl Into<String>) -> Result<Turn> {
        let handle = self
            .sessions
            .get(session_id)
            .await
            .ok_or(OrchestratorError::SessionNotFound(session_id))?;
        let mut session = handle.lock().await;
        self.run_turn(&mut session, Instruction::user(text)).await
    }

    /// Runs one turn on a session the caller already holds.
    pub async fn run_turn(&self, session: &mut Session, instruction: Instruction) -> Result<Turn> {
        metrics::counter!("orchestrator_turns_total").increment(1);
        let started = Instant::now();

        let result = self.drive(session, instruction).await;
        if let Err(e) = &result {
            session.set_checkout_in_progress(false);
            metrics::counter!("orchestrator_turns_failed_total").increment(1);
            tracing::warn!(error = %e, "turn aborted");
        }

        metrics::histogram!("orchestrator_turn_duration_seconds").record(started.elapsed().as_secs_f64());
        result
    }

    async fn drive(&self, session: &mut Session, instruction: Instruction) -> Result<Turn> {
        let mut turn = TurnContext::default();
        let mut transitions: Vec<Transition> = Vec::new();
        // Callers waiting for a return, with the instruction they were handling.
        let mut callers: Vec<(Role, Instruction)> = Vec::new();
        let mut role = session.active_role();
        let mut instruction = instruction;

        loop {
            let outcome = self.dispatch(role, session, &instruction, &mut turn).await?;

            match outcome {
                Outcome::Respond(text) => {
                    if !role.may_respond() {
                        return Err(OrchestratorError::MayNotRespond(role));
                    }
                    session.set_active_role(role);
                    let reply = match turn.greeting.take() {
                        Some(greeting) => {
                            session.mark_greeted();
                            format!("{greeting}\n\n{text}")
                        }
                        None => text,
                    };
                    tracing::info!(%role, hops = transitions.len(), "turn answered");
                    return Ok(Turn {
                        reply,
                        active_role: role,
                        transitions,
                        report: turn.report,
                    });
                }
                Outcome::Delegate { to, instruction: next } => {
                    if !role.may_delegate_to(to) {
                        return Err(OrchestratorError::IllegalDelegation { from: role, to });
                    }
                    metrics::counter!(
                        "orchestrator_delegations_total",
                        "from" => role.as_str(),
                        "to" => to.as_str()
                    )
                    .increment(1);
                    tracing::debug!(from = %role, %to, "delegating");
                    transitions.push(Transition::delegate(role, to));

                    // Root never returns, so nothing below it can be resumed.
                    if to == Role::Root {
                        callers.clear();
                    } else {
                        callers.push((role, instruction));
                    }
                    role = to;
                    instruction = next;
                    turn.resumed_from = None;
                    turn.refresh_error = None;
                }
                Outcome::Return(result) => {
                    let (caller, pending) = match callers.pop() {
                        Some(frame) => frame,
                        None => (Role::Root, result),
                    };
                    tracing::debug!(from = %role, to = %caller, "returning");
                    transitions.push(Transition::returned(role, caller));
                    turn.resumed_from = Some(role);
                    role = caller;
                    instruction = pending;
                }
            }

            if transitions.len() > self.config.max_hops {
                return Err(OrchestratorError::DelegationLimit(self.config.max_hops));
            }
        }
    }

    #[tracing::instrument(skip_all, fields(role = %role))]
    async fn dispatch(
        &self,
        role: Role,
        session: &mut Session,
        instruction: &Instruction,
        turn: &mut TurnContext,
    ) -> Result<Outcome> {
        match role {
            Role::Root => agents::root::handle(self, session, instruction, turn).await,
            Role::Suggestion => agents::suggestion::handle(self, session, instruction, turn).await,
            Role::Checkout => agents::checkout::handle(self, session, turn).await,
            Role::Inventory => agents::inventory::handle(self, turn).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::KeywordPlanner;
    use crate::protocol::TransitionKind;
    use domain::SharedState;
    use ledger::{InMemoryLedger, InventoryRow};

    fn orchestrator(rows: Vec<InventoryRow>) -> Orchestrator<InMemoryLedger, KeywordPlanner> {
        let inventory = InventoryService::new(InMemoryLedger::with_rows(rows), SharedState::new());
        Orchestrator::new(inventory, KeywordPlanner::new(), OrchestratorConfig::default())
    }

    #[tokio::test]
    async fn test_unknown_session_is_rejected() {
        let orchestrator = orchestrator(vec![]);
        let result = orchestrator.handle_message(SessionId::new(), "hello").await;
        assert!(matches!(result, Err(OrchestratorError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_first_turn_loads_inventory_and_greets() {
        let orchestrator = orchestrator(vec![InventoryRow::new("MUG-01", "Logo mug", 3)]);
        let id = orchestrator.sessions().create().await;

        let turn = orchestrator.handle_message(id, "hi").await.unwrap();

        assert!(turn.reply.starts_with(DEFAULT_GREETING));
        assert!(turn.reply.contains("Logo mug"));
        assert_eq!(turn.active_role, Role::Suggestion);
        let hops: Vec<(Role, Role, TransitionKind)> =
            turn.transitions.iter().map(|t| (t.from, t.to, t.kind)).collect();
        assert_eq!(
            hops,
            vec![
                (Role::Root, Role::Suggestion, TransitionKind::Delegate),
                (Role::Suggestion, Role::Inventory, TransitionKind::Delegate),
                (Role::Inventory, Role::Suggestion, TransitionKind::Return),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_ledger_aborts_turn() {
        let orchestrator = orchestrator(vec![]);
        let id = orchestrator.sessions().create().await;

        let result = orchestrator.handle_message(id, "hi").await;
        assert!(matches!(result, Err(OrchestratorError::EmptyInventory)));
    }

    #[tokio::test]
    async fn test_greeting_waits_for_a_delivered_response() {
        let orchestrator = orchestrator(vec![]);
        let id = orchestrator.sessions().create().await;

        let failed = orchestrator.handle_message(id, "hi").await;
        assert!(failed.is_err());
        {
            let handle = orchestrator.sessions().get(id).await.unwrap();
            assert!(!handle.lock().await.greeted());
        }

        orchestrator
            .inventory()
            .ledger()
            .insert(InventoryRow::new("MUG-01", "Logo mug", 3))
            .await;
        let turn = orchestrator.handle_message(id, "hi").await.unwrap();

        assert!(turn.reply.starts_with(DEFAULT_GREETING));
        let handle = orchestrator.sessions().get(id).await.unwrap();
        assert!(handle.lock().await.greeted());
    }

    #[tokio::test]
    async fn test_hop_limit_applies() {
        let inventory = InventoryService::new(
            InMemoryLedger::with_rows(vec![InventoryRow::new("MUG-01", "Logo mug", 3)]),
            SharedState::new(),
        );
        let config = OrchestratorConfig {
            max_hops: 1,
            ..OrchestratorConfig::default()
        };
        let orchestrator = Orchestrator::new(inventory, KeywordPlanner::new(), config);
        let id = orchestrator.sessions().create().await;

        let result = orchestrator.handle_message(id, "hi").await;
        assert!(matches!(result, Err(OrchestratorError::DelegationLimit(1))));
    }
}

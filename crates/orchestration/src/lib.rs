//! Delegation protocol for the event planning roles.
//!
//! Four fixed roles cooperate on every session:
//!
//! ```text
//! Root ──► Suggestion ◄──► Inventory
//!   │          │
//!   └────► Checkout ──► Inventory / Suggestion / Root
//! ```
//!
//! Each role receives an [`Instruction`] and answers with an [`Outcome`]:
//! a user-visible response, a delegation to another role, or a return to
//! whichever role delegated to it. The [`Orchestrator`] drives that
//! transition function for one turn at a time, validating every step
//! against the capability table in [`Role`].
//!
//! Running an event fans out one consumption call per cart line and then
//! clears the cart and refreshes the inventory in a second concurrent batch.

mod agents;
pub mod coordinator;
pub mod error;
pub mod fan_out;
pub mod planner;
pub mod protocol;
pub mod report;
pub mod role;
pub mod session;

pub use coordinator::{Orchestrator, OrchestratorConfig, Turn};
pub use error::{OrchestratorError, PlannerError, Result};
pub use fan_out::{BatchError, fan_out};
pub use planner::{Decision, KeywordPlanner, Planner, PlannerContext, ToolCall, ToolResult};
pub use protocol::{Instruction, Origin, Outcome, Transition, TransitionKind};
pub use report::{ConsumedLine, EventReport, FailedLine};
pub use role::Role;
pub use session::{Session, SessionRegistry};

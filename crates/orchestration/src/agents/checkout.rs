//! Checkout role: validates the cart and runs the event.

use chrono::Utc;
use domain::{CartLine, InventorySnapshot};
use ledger::Ledger;

use crate::coordinator::Orchestrator;
use crate::error::Result;
use crate::fan_out::fan_out;
use crate::planner::Planner;
use crate::protocol::{Instruction, Outcome};
use crate::report::EventReport;
use crate::role::Role;
use crate::session::Session;

use super::TurnContext;

pub(crate) async fn handle<L, P>(
    orchestrator: &Orchestrator<L, P>,
    session: &mut Session,
    turn: &mut TurnContext,
) -> Result<Outcome>
where
    L: Ledger + Clone + 'static,
    P: Planner,
{
    let lines = session.state().effective_cart();

    if lines.is_empty() && !session.checkout_in_progress() {
        tracing::info!("checkout requested with an empty cart");
        return Ok(Outcome::Delegate {
            to: Role::Root,
            instruction: Instruction::from_role(
                Role::Checkout,
                "The cart is empty, so there is no event to run yet.",
            ),
        });
    }
    session.set_checkout_in_progress(true);

    let snapshot = orchestrator.inventory().shared().inventory().await;
    if turn.resumed_from == Some(Role::Inventory) {
        if let Some(error) = turn.refresh_error.take() {
            session.set_checkout_in_progress(false);
            tracing::warn!(%error, "event not run, inventory refresh failed");
            return Ok(Outcome::Respond(format!(
                "The event cannot run right now because the inventory could not be refreshed ({error}). \
                 Your cart is unchanged; please try again shortly."
            )));
        }
    } else {
        // Every first entry in a turn re-reads the ledger unless a max age
        // is configured and the snapshot is younger than it.
        let fresh = orchestrator
            .config()
            .inventory_max_age
            .is_some_and(|max_age| !snapshot.is_stale(max_age, Utc::now()));
        if !fresh {
            return Ok(Outcome::Delegate {
                to: Role::Inventory,
                instruction: Instruction::from_role(Role::Checkout, "Refresh the inventory before the event runs."),
            });
        }
    }

    let shortages = shortages(&snapshot, &lines);
    if !shortages.is_empty() {
        session.set_checkout_in_progress(false);
        tracing::info!(lines = shortages.len(), "cart exceeds available stock");
        return Ok(Outcome::Delegate {
            to: Role::Suggestion,
            instruction: Instruction::from_role(
                Role::Checkout,
                format!(
                    "The event cannot run yet: {}. Please revise the cart.",
                    shortages.join("; ")
                ),
            ),
        });
    }

    let report = run_event(orchestrator, session, &lines).await;
    session.set_checkout_in_progress(false);
    session.set_last_report(report.clone());
    turn.report = Some(report.clone());

    Ok(Outcome::Respond(report.to_string()))
}

/// Describes every cart line the snapshot cannot cover.
fn shortages(snapshot: &InventorySnapshot, lines: &[CartLine]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| match snapshot.get(&line.product_id) {
            None => Some(format!("{} is not in the inventory", line.product_id)),
            Some(item) if item.product_count < line.count => Some(format!(
                "{} has {} available but {} were requested",
                item.product_name, item.product_count, line.count
            )),
            Some(_) => None,
        })
        .collect()
}

/// Consumes every line concurrently, then clears the cart and refreshes the
/// inventory concurrently.
#[tracing::instrument(skip_all, fields(lines = lines.len()))]
async fn run_event<L, P>(orchestrator: &Orchestrator<L, P>, session: &mut Session, lines: &[CartLine]) -> EventReport
where
    L: Ledger + Clone + 'static,
    P: Planner,
{
    metrics::counter!("orchestrator_events_total").increment(1);

    let calls = lines.iter().map(|line| {
        let inventory = orchestrator.inventory().clone();
        let product_id = line.product_id.clone();
        let count = line.count;
        async move { inventory.consume(&product_id, count).await }
    });
    let outcomes = fan_out(calls).await;

    let mut report = EventReport::default();
    for (line, outcome) in lines.iter().zip(outcomes) {
        report.record(&line.product_id, line.count, outcome);
    }

    let cart = orchestrator.cart();
    let state = session.state_mut();
    let (_, refreshed) = tokio::join!(async move { cart.clear(state) }, orchestrator.inventory().refresh_all());
    if let Err(e) = refreshed {
        report.refresh_error = Some(e.to_string());
    }

    tracing::info!(
        consumed = report.consumed.len(),
        failed = report.failed.len(),
        "event run finished"
    );
    report
}

//! Deterministic planner driven by keywords, used when no external
//! reasoning engine is configured.

use async_trait::async_trait;
use domain::{InventoryItem, InventorySnapshot};

use crate::error::PlannerError;
use crate::protocol::Origin;
use crate::role::Role;

use super::{Decision, Planner, PlannerContext, ToolCall};

const RUN_PHRASES: &[&str] = &[
    "run the event",
    "run event",
    "run it",
    "checkout",
    "check out",
    "start the event",
    "execute",
];

const REPORT_PHRASES: &[&str] = &["last event", "what happened", "summary"];

/// Routes and builds carts from plain commands.
///
/// Understood by the suggestion role, one per clause (clauses are split on
/// `,`, `;` and ` and `):
/// - `add <n> <product>`
/// - `set <product> to <n>`
/// - `remove <product>`
/// - `how many <product>`
/// - `clear cart`
///
/// `<product>` is matched against IDs first, then names (plural `s` ignored).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordPlanner;

impl KeywordPlanner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Planner for KeywordPlanner {
    async fn decide(&self, context: &PlannerContext<'_>) -> Result<Decision, PlannerError> {
        match context.role {
            Role::Root => Ok(route(context)),
            Role::Suggestion => Ok(suggest(context)),
            role => Err(PlannerError(format!("no keyword policy for {role}"))),
        }
    }
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    let lower = text.to_lowercase();
    phrases.iter().any(|p| lower.contains(p))
}

fn route(context: &PlannerContext<'_>) -> Decision {
    let instruction = context.instruction;
    let to = if instruction.is_from_user() && contains_any(&instruction.text, RUN_PHRASES) {
        Role::Checkout
    } else {
        Role::Suggestion
    };
    Decision::Transfer {
        to,
        instruction: instruction.text.clone(),
    }
}

fn suggest(context: &PlannerContext<'_>) -> Decision {
    if !context.tool_results.is_empty() {
        let done: Vec<&str> = context
            .tool_results
            .iter()
            .map(|r| r.detail.as_str())
            .collect();
        return Decision::Reply(format!("{}. {}", done.join("; "), describe_cart(context)));
    }

    let text = &context.instruction.text;
    if let Origin::Role(_) = context.instruction.origin {
        return Decision::Reply(format!("{} {}", text, describe_stock(context.inventory)));
    }

    match parse_commands(text, context.inventory) {
        Err(unknown) => {
            return Decision::Reply(format!(
                "I couldn't find a product matching \"{unknown}\". {}",
                describe_stock(context.inventory)
            ));
        }
        Ok(calls) if !calls.is_empty() => return Decision::Tools(calls),
        Ok(_) => {}
    }

    if contains_any(text, RUN_PHRASES) {
        return Decision::Transfer {
            to: Role::Checkout,
            instruction: text.clone(),
        };
    }

    if let Some(report) = context.last_report
        && contains_any(text, REPORT_PHRASES)
    {
        return Decision::Reply(report.to_string());
    }

    Decision::Reply(format!(
        "{} {}",
        describe_stock(context.inventory),
        describe_cart(context)
    ))
}

fn describe_stock(inventory: &InventorySnapshot) -> String {
    let available: Vec<String> = inventory
        .items()
        .iter()
        .filter(|item| item.product_count > 0)
        .map(|item| {
            format!(
                "{} ({}, {} available)",
                item.product_name, item.product_id, item.product_count
            )
        })
        .collect();

    if available.is_empty() {
        "Nothing is in stock right now.".to_string()
    } else {
        format!("For your event I can offer: {}.", available.join(", "))
    }
}

fn describe_cart(context: &PlannerContext<'_>) -> String {
    if context.cart.is_empty() {
        return "Your cart is empty.".to_string();
    }
    let lines: Vec<String> = context
        .cart
        .iter()
        .map(|line| {
            let name = context
                .inventory
                .get(&line.product_id)
                .map(|item| item.product_name.as_str())
                .unwrap_or(line.product_id.as_str());
            format!("{} x {}", line.count, name)
        })
        .collect();
    format!("Your cart: {}.", lines.join(", "))
}

/// Parses every recognised clause. Returns the first product phrase that
/// could not be resolved as the error.
fn parse_commands(text: &str, inventory: &InventorySnapshot) -> Result<Vec<ToolCall>, String> {
    let normalized = text.to_lowercase().replace([',', ';'], " and ");
    let mut calls = Vec::new();

    for clause in normalized.split(" and ") {
        let words: Vec<&str> = clause
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| c == '.' || c == '!' || c == '?'))
            .filter(|w| !w.is_empty())
            .collect();

        if let Some(call) = parse_clause(&words, inventory)? {
            calls.push(call);
        }
    }
    Ok(calls)
}

fn parse_clause(words: &[&str], inventory: &InventorySnapshot) -> Result<Option<ToolCall>, String> {
    match words {
        [] => Ok(None),
        ["clear", rest @ ..] if rest.iter().any(|w| *w == "cart" || *w == "everything") => {
            Ok(Some(ToolCall::ClearCart))
        }
        ["add", n, product @ ..] if !product.is_empty() => match n.parse::<u32>() {
            Ok(count) => resolve(product, inventory)
                .map(|item| Some(ToolCall::AddToCart {
                    product_id: item.product_id.clone(),
                    count,
                })),
            Err(_) => Ok(None),
        },
        ["set", rest @ ..] => {
            let Some(pos) = rest.iter().rposition(|w| *w == "to") else {
                return Ok(None);
            };
            let (product, tail) = rest.split_at(pos);
            match tail.get(1).and_then(|n| n.parse::<u32>().ok()) {
                Some(count) if !product.is_empty() => resolve(product, inventory).map(|item| {
                    Some(ToolCall::AddToCart {
                        product_id: item.product_id.clone(),
                        count,
                    })
                }),
                _ => Ok(None),
            }
        }
        ["remove", product @ ..] if !product.is_empty() => {
            resolve(product, inventory).map(|item| {
                Some(ToolCall::AddToCart {
                    product_id: item.product_id.clone(),
                    count: 0,
                })
            })
        }
        ["how", "many", product @ ..] if !product.is_empty() => {
            resolve(product, inventory).map(|item| {
                Some(ToolCall::LookupItem {
                    product_id: item.product_id.clone(),
                })
            })
        }
        _ => Ok(None),
    }
}

fn resolve<'a>(words: &[&str], inventory: &'a InventorySnapshot) -> Result<&'a InventoryItem, String> {
    let phrase = words
        .iter()
        .filter(|w| !matches!(**w, "the" | "a" | "an" | "of"))
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let singular = phrase.strip_suffix('s').unwrap_or(&phrase);

    let items = inventory.items();
    items
        .iter()
        .find(|item| item.product_id.as_str().eq_ignore_ascii_case(&phrase))
        .or_else(|| {
            items.iter().find(|item| {
                let name = item.product_name.to_lowercase();
                name == phrase || name == singular
            })
        })
        .or_else(|| {
            items
                .iter()
                .find(|item| !singular.is_empty() && item.product_name.to_lowercase().contains(singular))
        })
        .ok_or_else(|| phrase.clone())
}

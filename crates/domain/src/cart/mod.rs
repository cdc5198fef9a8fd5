//! Session cart: line items and the service that writes them.

mod line;
mod service;

pub use line::{CartLine, effective_lines};
pub use service::CartService;

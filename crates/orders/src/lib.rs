//! Orders domain module.
//!
//! This crate contains the order lifecycle (`pending` → `closed`) and the sales
//! aggregations derived from order history, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod order;
pub mod report;

pub use order::{Order, OrderDraft, OrderItem, OrderStatus};
pub use report::{PopularItem, SalesReport};

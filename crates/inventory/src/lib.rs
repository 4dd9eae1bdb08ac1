//! Inventory domain module.
//!
//! This crate contains business rules for raw ingredients, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;

pub use item::{stock_covers, InventoryItem, Unit, STOCK_TOLERANCE};

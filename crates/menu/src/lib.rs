//! Menu domain module.
//!
//! This crate contains business rules for sellable products and their recipes,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;

pub use item::{MenuItem, MenuItemIngredient, MAX_DESCRIPTION_LEN};

//! `hotcoffee-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the entity contract used by the repositories, the domain error
//! model and the field rules shared by every entity's validation.

pub mod entity;
pub mod error;
pub mod id;
pub mod validate;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{IngredientId, OrderId, ProductId};

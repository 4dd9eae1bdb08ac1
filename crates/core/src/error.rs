//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// stock invariants). Storage and lookup failures belong to the service layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (empty or outside the allowed character set).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A deduction would drive stock below zero.
    #[error("insufficient stock for {ingredient_id}: available {available}, required {required}")]
    InsufficientStock {
        ingredient_id: String,
        available: f64,
        required: f64,
    },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn insufficient_stock(ingredient_id: impl Into<String>, available: f64, required: f64) -> Self {
        Self::InsufficientStock {
            ingredient_id: ingredient_id.into(),
            available,
            required,
        }
    }
}

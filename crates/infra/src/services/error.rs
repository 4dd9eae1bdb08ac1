use std::fmt::Display;

use thiserror::Error;

use hotcoffee_core::DomainError;

use crate::store::StoreError;

/// Service-level failures, one variant per externally visible outcome.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    /// Not enough stock, or a recipe names an ingredient that is not stocked.
    #[error("{0}")]
    Unavailable(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(kind: &str, id: impl Display) -> Self {
        Self::NotFound(format!("{kind} {id} not found"))
    }

    pub fn already_exists(kind: &str, id: impl Display) -> Self {
        Self::AlreadyExists(format!("{kind} {id} already exists"))
    }

    /// Updates never rename the key: a body id that differs from the path id is rejected.
    pub fn ensure_same_id<I>(path_id: &I, body_id: &I) -> Result<(), Self>
    where
        I: PartialEq + Display,
    {
        if path_id != body_id {
            return Err(Self::Validation(format!(
                "ID mismatch in request body and URL: {body_id} != {path_id}"
            )));
        }
        Ok(())
    }

    /// Stable machine-readable code for the error category.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::Unavailable(_) => "unavailable",
            Self::Validation(_) => "validation_error",
            Self::Storage(_) => "storage_error",
        }
    }

    /// Prefix the message with `context`, keeping the category.
    pub fn with_context(self, context: impl Display) -> Self {
        match self {
            Self::NotFound(m) => Self::NotFound(format!("{context}: {m}")),
            Self::AlreadyExists(m) => Self::AlreadyExists(format!("{context}: {m}")),
            Self::Unavailable(m) => Self::Unavailable(format!("{context}: {m}")),
            Self::Validation(m) => Self::Validation(format!("{context}: {m}")),
            storage @ Self::Storage(_) => storage,
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(m) | DomainError::InvalidId(m) => Self::Validation(m),
            stock @ DomainError::InsufficientStock { .. } => Self::Unavailable(stock.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_categories() {
        assert_eq!(ServiceError::from(DomainError::validation("bad")).code(), "validation_error");
        assert_eq!(ServiceError::from(DomainError::invalid_id("bad id")).code(), "validation_error");

        let stock = ServiceError::from(DomainError::insufficient_stock("milk", 1.0, 2.0));
        assert_eq!(stock.code(), "unavailable");
        assert!(stock.to_string().contains("milk"));
    }

    #[test]
    fn mismatched_ids_are_a_validation_error() {
        assert!(ServiceError::ensure_same_id(&"latte", &"latte").is_ok());
        let err = ServiceError::ensure_same_id(&"latte", &"mocha").unwrap_err();
        assert_eq!(err.code(), "validation_error");
        assert!(err.to_string().contains("mocha != latte"));
    }

    #[test]
    fn context_keeps_category() {
        let err = ServiceError::not_found("menu item", "latte").with_context("item 2");
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.to_string(), "item 2: menu item latte not found");
    }
}

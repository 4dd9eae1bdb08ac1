//! Strongly-typed identifiers used across the domain.
//!
//! Ingredient and product ids are chosen by clients; order ids are generated.
//! All of them share one canonical form: lower-case ASCII letters, digits and
//! underscores.

use core::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9_]+$").expect("static id pattern"))
}

/// Identifier of an inventory ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(String);

/// Identifier of a menu item (product).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a customer order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

macro_rules! impl_string_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Normalize (trim + lower-case) and validate a raw identifier.
            pub fn parse(raw: &str) -> DomainResult<Self> {
                let normalized = raw.trim().to_lowercase();
                if normalized.is_empty() || !id_pattern().is_match(&normalized) {
                    return Err(DomainError::invalid_id(format!(
                        "{} must be non-empty and contain only letters, digits and underscores (got {raw:?})",
                        $name
                    )));
                }
                Ok(Self(normalized))
            }

            /// Re-run normalization on an id that arrived through deserialization.
            pub fn normalized(&self) -> DomainResult<Self> {
                Self::parse(&self.0)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_id!(IngredientId, "ingredient_id");
impl_string_id!(ProductId, "product_id");
impl_string_id!(OrderId, "order_id");

impl OrderId {
    /// Generate a fresh order id for a customer.
    ///
    /// The customer part keeps ids readable in the order document; uniqueness
    /// comes from the UUIDv7 suffix, not from the clock.
    pub fn generate(customer_name: &str) -> Self {
        Self::with_uuid(customer_name, Uuid::now_v7())
    }

    /// Deterministic variant of [`OrderId::generate`] (tests, imports).
    pub fn with_uuid(customer_name: &str, uuid: Uuid) -> Self {
        let customer: String = customer_name
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();

        if customer.is_empty() {
            Self(format!("order_{}", uuid.simple()))
        } else {
            Self(format!("order_{customer}_{}", uuid.simple()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let id = IngredientId::parse("  Espresso_Shot ").unwrap();
        assert_eq!(id.as_str(), "espresso_shot");
    }

    #[test]
    fn parse_rejects_empty_and_foreign_characters() {
        assert!(matches!(ProductId::parse("   "), Err(DomainError::InvalidId(_))));
        assert!(matches!(ProductId::parse("flat-white"), Err(DomainError::InvalidId(_))));
        assert!(matches!(ProductId::parse("latte macchiato"), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn generated_order_ids_are_distinct_and_canonical() {
        let a = OrderId::generate("Alice Smith");
        let b = OrderId::generate("Alice Smith");

        assert_ne!(a, b);
        assert!(a.as_str().starts_with("order_alice_smith_"));
        assert_eq!(OrderId::parse(a.as_str()).unwrap(), a);
    }

    #[test]
    fn generated_order_id_without_usable_name_still_parses() {
        let id = OrderId::with_uuid("   ", Uuid::nil());
        assert_eq!(id.as_str(), "order_00000000000000000000000000000000");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ProductId::parse("latte").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"latte\"");
        let back: ProductId = serde_json::from_str("\"latte\"").unwrap();
        assert_eq!(back, id);
    }
}

use serde::{Deserialize, Serialize};

use hotcoffee_core::validate::{ensure_non_negative, normalize_name};
use hotcoffee_core::{DomainError, DomainResult, Entity, IngredientId};

/// Unit an ingredient is stocked in.
///
/// Serialized lower-case; deserialization goes through [`Unit::parse`] so
/// inbound payloads may use any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Unit {
    /// Grams.
    G,
    /// Millilitres.
    Ml,
    /// Espresso shots (count).
    Shots,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::G, Unit::Ml, Unit::Shots];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::G => "g",
            Unit::Ml => "ml",
            Unit::Shots => "shots",
        }
    }

    /// Parse a unit leniently (surrounding whitespace and case are ignored).
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized = raw.trim().to_lowercase();
        Unit::ALL
            .into_iter()
            .find(|u| u.as_str() == normalized)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Unit::ALL.iter().map(Unit::as_str).collect();
                DomainError::validation(format!("unit must be one of {}", allowed.join(", ")))
            })
    }
}

impl TryFrom<String> for Unit {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Unit::parse(&value)
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative slack allowed when stock is compared against demand computed in
/// floating point (`0.1 * 3` is `0.30000000000000004`).
pub const STOCK_TOLERANCE: f64 = 1e-9;

/// Whether `available` covers `required`. Inclusive, within [`STOCK_TOLERANCE`].
pub fn stock_covers(available: f64, required: f64) -> bool {
    available >= required - STOCK_TOLERANCE * required.abs().max(1.0)
}

/// A raw ingredient on hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub ingredient_id: IngredientId,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
}

impl InventoryItem {
    pub fn new(
        ingredient_id: IngredientId,
        name: impl Into<String>,
        quantity: f64,
        unit: Unit,
    ) -> Self {
        Self {
            ingredient_id,
            name: name.into(),
            quantity,
            unit,
        }
    }

    /// Validate inbound data and return the canonical form that gets stored.
    pub fn validate_and_normalize(self) -> DomainResult<Self> {
        let ingredient_id = self.ingredient_id.normalized()?;
        let name = normalize_name("inventory name", &self.name)?;
        ensure_non_negative("quantity", self.quantity)?;

        Ok(Self {
            ingredient_id,
            name,
            quantity: self.quantity,
            unit: self.unit,
        })
    }

    /// Whether at least `required` is on hand (inclusive).
    pub fn covers(&self, required: f64) -> bool {
        stock_covers(self.quantity, required)
    }

    /// Remove `amount` from stock. Stock never goes below zero.
    pub fn deduct(&mut self, amount: f64) -> DomainResult<()> {
        ensure_non_negative("deducted amount", amount)?;
        if !self.covers(amount) {
            return Err(DomainError::insufficient_stock(
                self.ingredient_id.as_str(),
                self.quantity,
                amount,
            ));
        }
        // Rounding slack accepted by `covers` must not leave a tiny negative.
        self.quantity = (self.quantity - amount).max(0.0);
        Ok(())
    }
}

impl Entity for InventoryItem {
    type Id = IngredientId;

    const KIND: &'static str = "inventory item";

    fn id(&self) -> &Self::Id {
        &self.ingredient_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn espresso(quantity: f64) -> InventoryItem {
        InventoryItem::new(
            IngredientId::parse("espresso_shot").unwrap(),
            "Espresso Shot",
            quantity,
            Unit::Shots,
        )
    }

    #[test]
    fn validate_normalizes_name() {
        let item = InventoryItem::new(
            IngredientId::parse("milk").unwrap(),
            "  whole milk ",
            500.0,
            Unit::Ml,
        )
        .validate_and_normalize()
        .unwrap();

        assert_eq!(item.name, "Whole Milk");
        assert_eq!(item.unit, Unit::Ml);
        assert_eq!(item.quantity, 500.0);
    }

    #[test]
    fn validate_rejects_negative_quantity() {
        let err = espresso(-1.0).validate_and_normalize().unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("quantity")));
    }

    #[test]
    fn unit_parsing_is_case_insensitive_and_closed() {
        assert_eq!(Unit::parse(" ML ").unwrap(), Unit::Ml);
        assert!(matches!(Unit::parse("kg"), Err(DomainError::Validation(_))));
    }

    #[test]
    fn unit_deserializes_leniently_but_only_from_the_known_set() {
        let item: InventoryItem = serde_json::from_str(
            r#"{"ingredient_id":"sugar","name":"Sugar","quantity":100,"unit":" G "}"#,
        )
        .unwrap();
        assert_eq!(item.unit, Unit::G);
        assert_eq!(serde_json::to_value(item.unit).unwrap(), "g");

        let bad = serde_json::from_str::<InventoryItem>(
            r#"{"ingredient_id":"sugar","name":"Sugar","quantity":100,"unit":"cups"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn deduct_exact_stock_reaches_zero() {
        let mut item = espresso(2.0);
        item.deduct(2.0).unwrap();
        assert_eq!(item.quantity, 0.0);
    }

    #[test]
    fn deduct_beyond_stock_fails_and_leaves_quantity() {
        let mut item = espresso(1.0);
        let err = item.deduct(2.0).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert_eq!(item.quantity, 1.0);
    }

    #[test]
    fn fractional_demand_equal_to_stock_is_covered() {
        let mut item = espresso(0.3);
        let required = 0.1 * 3.0;
        assert!(required > 0.3);

        assert!(item.covers(required));
        item.deduct(required).unwrap();
        assert_eq!(item.quantity, 0.0);
    }

    #[test]
    fn tolerance_does_not_hide_real_shortfalls() {
        assert!(stock_covers(10.0, 10.0));
        assert!(!stock_covers(0.29, 0.3));
        assert!(!stock_covers(999.999, 1000.0));
        assert!(stock_covers(1e6, 1e6 + 1e-4));
    }

    proptest! {
        /// Property: a successful deduction never drives stock negative.
        #[test]
        fn deduct_never_goes_negative(on_hand in 0u32..1000, amount in 0u32..1000) {
            let mut item = espresso(on_hand as f64);
            let result = item.deduct(amount as f64);
            prop_assert!(item.quantity >= 0.0);
            prop_assert_eq!(result.is_ok(), amount <= on_hand);
        }
    }
}

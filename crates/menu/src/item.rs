use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use hotcoffee_core::validate::{ensure_non_negative, ensure_positive, normalize_name};
use hotcoffee_core::{DomainError, DomainResult, Entity, IngredientId, ProductId};

/// Longest accepted menu description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// One recipe line: how much of an ingredient a single unit of the product uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemIngredient {
    pub ingredient_id: IngredientId,
    pub quantity: f64,
}

impl MenuItemIngredient {
    pub fn new(ingredient_id: IngredientId, quantity: f64) -> Self {
        Self {
            ingredient_id,
            quantity,
        }
    }

    /// Amount of the ingredient needed for `units` of the product.
    pub fn required_for(&self, units: u32) -> f64 {
        self.quantity * f64::from(units)
    }

    fn validate_and_normalize(self) -> DomainResult<Self> {
        let ingredient_id = self.ingredient_id.normalized()?;
        ensure_positive("ingredient quantity", self.quantity)?;
        Ok(Self {
            ingredient_id,
            quantity: self.quantity,
        })
    }
}

/// A sellable product and its recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub ingredients: Vec<MenuItemIngredient>,
}

impl MenuItem {
    /// Validate inbound data and return the canonical form that gets stored.
    ///
    /// Ingredient ids are not resolved against the inventory here; a recipe
    /// that names an unknown ingredient is only rejected when an order needs it.
    pub fn validate_and_normalize(self) -> DomainResult<Self> {
        let product_id = self.product_id.normalized()?;
        let name = normalize_name("menu item name", &self.name)?;
        ensure_non_negative("price", self.price)?;

        let description = self.description.trim().to_string();
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(DomainError::validation(format!(
                "description cannot exceed {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        let mut seen = HashSet::new();
        let mut ingredients = Vec::with_capacity(self.ingredients.len());
        for line in self.ingredients {
            let line = line
                .validate_and_normalize()
                .map_err(|e| DomainError::validation(format!("invalid ingredient in menu item: {e}")))?;
            if !seen.insert(line.ingredient_id.clone()) {
                return Err(DomainError::validation(format!(
                    "ingredient {} is listed more than once",
                    line.ingredient_id
                )));
            }
            ingredients.push(line);
        }

        Ok(Self {
            product_id,
            name,
            description,
            price: self.price,
            ingredients,
        })
    }

    /// Ingredient demand for `units` of this product, in recipe order.
    pub fn demand(&self, units: u32) -> impl Iterator<Item = (&IngredientId, f64)> + '_ {
        self.ingredients
            .iter()
            .map(move |line| (&line.ingredient_id, line.required_for(units)))
    }
}

impl Entity for MenuItem {
    type Id = ProductId;

    const KIND: &'static str = "menu item";

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}

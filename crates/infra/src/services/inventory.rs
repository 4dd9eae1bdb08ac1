use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{info, instrument, warn};

use hotcoffee_core::{Entity, IngredientId};
use hotcoffee_inventory::{stock_covers, InventoryItem};
use hotcoffee_menu::MenuItemIngredient;

use crate::repository::InventoryRepository;
use crate::store::CollectionStore;

use super::ServiceError;

/// Ingredient amounts keyed by ingredient id.
pub type Demand = BTreeMap<IngredientId, f64>;

/// Sum the recipe lines for `units` of a product into a demand map.
pub fn demand_for(ingredients: &[MenuItemIngredient], units: u32) -> Demand {
    let mut demand = Demand::new();
    add_demand(&mut demand, ingredients, units);
    demand
}

/// Add the recipe lines for `units` of a product into an existing demand map.
pub fn add_demand(demand: &mut Demand, ingredients: &[MenuItemIngredient], units: u32) {
    for line in ingredients {
        *demand.entry(line.ingredient_id.clone()).or_insert(0.0) += line.required_for(units);
    }
}

/// Exclusive claim on stock-changing operations.
///
/// While held, no other order creation or inventory write can interleave
/// between a stock check and the deduction that follows it.
#[must_use = "the reservation is released as soon as it is dropped"]
pub struct StockReservation<'a> {
    _guard: MutexGuard<'a, ()>,
}

/// Inventory CRUD plus the stock checks and deductions used by orders.
pub struct InventoryService<S> {
    repo: InventoryRepository<S>,
    stock_lock: Mutex<()>,
}

impl<S> InventoryService<S>
where
    S: CollectionStore<InventoryItem>,
{
    pub fn new(repo: InventoryRepository<S>) -> Self {
        Self {
            repo,
            stock_lock: Mutex::new(()),
        }
    }

    /// Take the stock lock. Callers that already hold a reservation must not
    /// call the CRUD methods below (they reserve internally).
    pub fn reserve(&self) -> StockReservation<'_> {
        // The guarded value is `()`, so a panic elsewhere cannot leave it inconsistent.
        let guard = self.stock_lock.lock().unwrap_or_else(PoisonError::into_inner);
        StockReservation { _guard: guard }
    }

    #[instrument(skip(self, item), fields(ingredient_id = %item.ingredient_id), err)]
    pub fn create_inventory_item(&self, item: InventoryItem) -> Result<InventoryItem, ServiceError> {
        let item = item.validate_and_normalize()?;
        let _reservation = self.reserve();

        if !self.repo.insert_if_absent(item.clone())? {
            return Err(ServiceError::already_exists(InventoryItem::KIND, &item.ingredient_id));
        }
        info!(ingredient_id = %item.ingredient_id, quantity = item.quantity, unit = %item.unit, "inventory item created");
        Ok(item)
    }

    /// Create items one at a time. Stops at the first failure; earlier items stay created.
    #[instrument(skip(self, items), fields(count = items.len()), err)]
    pub fn create_inventory_items(&self, items: Vec<InventoryItem>) -> Result<Vec<InventoryItem>, ServiceError> {
        let mut created = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            let item = self
                .create_inventory_item(item)
                .map_err(|e| e.with_context(format!("inventory item at index {idx}")))?;
            created.push(item);
        }
        Ok(created)
    }

    #[instrument(skip(self), err)]
    pub fn get_inventory_item(&self, id: &IngredientId) -> Result<InventoryItem, ServiceError> {
        self.repo
            .get_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(InventoryItem::KIND, id))
    }

    #[instrument(skip(self), err)]
    pub fn get_all_inventory_items(&self) -> Result<Vec<InventoryItem>, ServiceError> {
        Ok(self.repo.get_all()?)
    }

    /// Replace an item. The body must carry the same id as the path.
    #[instrument(skip(self, item), err)]
    pub fn update_inventory_item(&self, id: &IngredientId, item: InventoryItem) -> Result<InventoryItem, ServiceError> {
        let item = item.validate_and_normalize()?;
        ServiceError::ensure_same_id(&id.normalized()?, &item.ingredient_id)?;
        let _reservation = self.reserve();

        if !self.repo.update(item.clone())? {
            return Err(ServiceError::not_found(InventoryItem::KIND, id));
        }
        info!(ingredient_id = %item.ingredient_id, quantity = item.quantity, "inventory item updated");
        Ok(item)
    }

    #[instrument(skip(self), err)]
    pub fn delete_inventory_item(&self, id: &IngredientId) -> Result<(), ServiceError> {
        let _reservation = self.reserve();

        if !self.repo.delete(id)? {
            return Err(ServiceError::not_found(InventoryItem::KIND, id));
        }
        info!(ingredient_id = %id, "inventory item deleted");
        Ok(())
    }

    /// Current quantity per ingredient (one read of the collection).
    pub fn stock_levels(&self) -> Result<HashMap<IngredientId, f64>, ServiceError> {
        Ok(self
            .repo
            .get_all()?
            .into_iter()
            .map(|i| (i.ingredient_id, i.quantity))
            .collect())
    }

    /// Whether every recipe line is covered for `units` of the product.
    ///
    /// A missing ingredient counts as not covered. Stock exactly equal to the
    /// requirement is enough.
    #[instrument(skip(self, ingredients), err)]
    pub fn check_ingredients(&self, ingredients: &[MenuItemIngredient], units: u32) -> Result<bool, ServiceError> {
        let levels = self.stock_levels()?;
        for (ingredient_id, required) in demand_for(ingredients, units) {
            match levels.get(&ingredient_id) {
                Some(&available) if stock_covers(available, required) => {}
                Some(&available) => {
                    info!(%ingredient_id, available, required, "not enough stock");
                    return Ok(false);
                }
                None => {
                    info!(%ingredient_id, "ingredient not stocked");
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Check a combined demand (e.g. every line of an order) against stock.
    #[instrument(skip(self, demand), err)]
    pub fn check_demand(&self, demand: &Demand) -> Result<(), ServiceError> {
        let levels = self.stock_levels()?;
        for (ingredient_id, &required) in demand {
            shortfall(ingredient_id, levels.get(ingredient_id).copied(), required)?;
        }
        Ok(())
    }

    /// Deduct the recipe for `units` of a product.
    pub fn deduct_ingredients(&self, ingredients: &[MenuItemIngredient], units: u32) -> Result<(), ServiceError> {
        self.deduct_demand(&demand_for(ingredients, units))
    }

    /// Deduct a demand map in one write. Every line is verified before any
    /// quantity changes, so on error the stored inventory is untouched.
    #[instrument(skip(self, demand), fields(lines = demand.len()), err)]
    pub fn deduct_demand(&self, demand: &Demand) -> Result<(), ServiceError> {
        self.repo.modify(|items| {
            let mut plan = Vec::with_capacity(demand.len());
            for (ingredient_id, &required) in demand {
                let idx = items.iter().position(|i| &i.ingredient_id == ingredient_id);
                shortfall(ingredient_id, idx.map(|i| items[i].quantity), required)?;
                if let Some(idx) = idx {
                    plan.push((idx, required));
                }
            }

            for (idx, amount) in plan {
                items[idx].deduct(amount)?;
            }
            Ok::<_, ServiceError>(())
        })?;

        info!(lines = demand.len(), "ingredients deducted");
        Ok(())
    }
}

fn shortfall(ingredient_id: &IngredientId, available: Option<f64>, required: f64) -> Result<(), ServiceError> {
    match available {
        Some(available) if stock_covers(available, required) => Ok(()),
        Some(available) => {
            warn!(%ingredient_id, available, required, "insufficient stock");
            Err(ServiceError::Unavailable(format!(
                "insufficient stock for {ingredient_id}: available {available}, required {required}"
            )))
        }
        None => Err(ServiceError::Unavailable(format!("ingredient {ingredient_id} is not in inventory"))),
    }
}

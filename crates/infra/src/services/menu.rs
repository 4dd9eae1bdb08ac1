use std::sync::Arc;

use tracing::{info, instrument};

use hotcoffee_core::{Entity, ProductId};
use hotcoffee_inventory::{stock_covers, InventoryItem};
use hotcoffee_menu::{MenuItem, MenuItemIngredient};

use crate::repository::MenuRepository;
use crate::store::CollectionStore;

use super::{InventoryService, ServiceError};

/// Menu CRUD plus availability and preparation against the inventory.
pub struct MenuService<MS, IS> {
    repo: MenuRepository<MS>,
    inventory: Arc<InventoryService<IS>>,
}

impl<MS, IS> MenuService<MS, IS>
where
    MS: CollectionStore<MenuItem>,
    IS: CollectionStore<InventoryItem>,
{
    pub fn new(repo: MenuRepository<MS>, inventory: Arc<InventoryService<IS>>) -> Self {
        Self { repo, inventory }
    }

    #[instrument(skip(self, item), fields(product_id = %item.product_id), err)]
    pub fn create_menu_item(&self, item: MenuItem) -> Result<MenuItem, ServiceError> {
        let item = item.validate_and_normalize()?;

        if !self.repo.insert_if_absent(item.clone())? {
            return Err(ServiceError::already_exists(MenuItem::KIND, &item.product_id));
        }
        info!(product_id = %item.product_id, price = item.price, "menu item created");
        Ok(item)
    }

    /// Create items one at a time. Stops at the first failure; earlier items stay created.
    #[instrument(skip(self, items), fields(count = items.len()), err)]
    pub fn create_menu_items(&self, items: Vec<MenuItem>) -> Result<Vec<MenuItem>, ServiceError> {
        let mut created = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            let item = self
                .create_menu_item(item)
                .map_err(|e| e.with_context(format!("menu item at index {idx}")))?;
            created.push(item);
        }
        Ok(created)
    }

    #[instrument(skip(self), err)]
    pub fn get_menu_item(&self, id: &ProductId) -> Result<MenuItem, ServiceError> {
        self.repo
            .get_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(MenuItem::KIND, id))
    }

    #[instrument(skip(self), err)]
    pub fn get_all_menu_items(&self) -> Result<Vec<MenuItem>, ServiceError> {
        Ok(self.repo.get_all()?)
    }

    /// Menu items whose full recipe is in stock for one unit.
    #[instrument(skip(self), err)]
    pub fn get_available_menu_items(&self) -> Result<Vec<MenuItem>, ServiceError> {
        let levels = self.inventory.stock_levels()?;
        let available = self
            .repo
            .get_all()?
            .into_iter()
            .filter(|item| {
                item.demand(1).all(|(ingredient_id, required)| {
                    levels.get(ingredient_id).is_some_and(|&on_hand| stock_covers(on_hand, required))
                })
            })
            .collect();
        Ok(available)
    }

    /// Replace a menu item. The body must carry the same id as the path.
    ///
    /// Recipe changes take the stock reservation so they cannot land in the
    /// middle of an order's fulfillment.
    #[instrument(skip(self, item), err)]
    pub fn update_menu_item(&self, id: &ProductId, item: MenuItem) -> Result<MenuItem, ServiceError> {
        let item = item.validate_and_normalize()?;
        ServiceError::ensure_same_id(&id.normalized()?, &item.product_id)?;
        let _reservation = self.inventory.reserve();

        if !self.repo.update(item.clone())? {
            return Err(ServiceError::not_found(MenuItem::KIND, id));
        }
        info!(product_id = %item.product_id, "menu item updated");
        Ok(item)
    }

    #[instrument(skip(self), err)]
    pub fn delete_menu_item(&self, id: &ProductId) -> Result<(), ServiceError> {
        let _reservation = self.inventory.reserve();

        if !self.repo.delete(id)? {
            return Err(ServiceError::not_found(MenuItem::KIND, id));
        }
        info!(product_id = %id, "menu item deleted");
        Ok(())
    }

    /// Recipe of a product.
    pub fn recipe(&self, id: &ProductId) -> Result<Vec<MenuItemIngredient>, ServiceError> {
        Ok(self.get_menu_item(id)?.ingredients)
    }

    /// Whether `units` of the product can be made from current stock.
    #[instrument(skip(self), err)]
    pub fn is_menu_available(&self, id: &ProductId, units: u32) -> Result<bool, ServiceError> {
        let item = self.get_menu_item(id)?;
        self.inventory.check_ingredients(&item.ingredients, units)
    }

    /// Consume the ingredients for `units` of the product.
    #[instrument(skip(self), err)]
    pub fn prepare_menu(&self, id: &ProductId, units: u32) -> Result<(), ServiceError> {
        let item = self.get_menu_item(id)?;
        self.inventory.deduct_ingredients(&item.ingredients, units)
    }
}

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument};

use hotcoffee_core::{Entity, OrderId};
use hotcoffee_inventory::InventoryItem;
use hotcoffee_menu::MenuItem;
use hotcoffee_orders::{Order, OrderDraft};

use crate::repository::OrderRepository;
use crate::store::CollectionStore;

use super::inventory::{Demand, add_demand};
use super::{InventoryService, MenuService, ServiceError};

/// Order lifecycle and fulfillment.
pub struct OrderService<OS, MS, IS> {
    repo: OrderRepository<OS>,
    menu: Arc<MenuService<MS, IS>>,
    inventory: Arc<InventoryService<IS>>,
}

impl<OS, MS, IS> OrderService<OS, MS, IS>
where
    OS: CollectionStore<Order>,
    MS: CollectionStore<MenuItem>,
    IS: CollectionStore<InventoryItem>,
{
    pub fn new(
        repo: OrderRepository<OS>,
        menu: Arc<MenuService<MS, IS>>,
        inventory: Arc<InventoryService<IS>>,
    ) -> Self {
        Self { repo, menu, inventory }
    }

    /// Validate, check stock for the whole order, deduct, then persist a
    /// pending order.
    ///
    /// The stock reservation is held from the first check until the
    /// deduction finishes, so concurrent orders and recipe edits cannot
    /// interleave with it. The checked demand is deducted in a single write:
    /// either every ingredient is deducted or none is.
    #[instrument(skip(self, draft), fields(customer = %draft.customer_name, lines = draft.items.len()), err)]
    pub fn create_order(&self, draft: OrderDraft) -> Result<Order, ServiceError> {
        let draft = draft.validate_and_normalize()?;
        info!(customer = %draft.customer_name, "creating order");

        let _reservation = self.inventory.reserve();

        let mut demand = Demand::new();
        for item in &draft.items {
            let available = self.menu.is_menu_available(&item.product_id, item.quantity)?;
            if !available {
                return Err(ServiceError::Unavailable(format!(
                    "{} x{} cannot be made from current stock",
                    item.product_id, item.quantity
                )));
            }
            add_demand(&mut demand, &self.menu.recipe(&item.product_id)?, item.quantity);
        }

        // Lines that share an ingredient must fit together, not only one by one.
        self.inventory.check_demand(&demand)?;
        self.inventory.deduct_demand(&demand)?;

        let order = Order::open(OrderId::generate(&draft.customer_name), draft, Utc::now());
        if let Err(e) = self.repo.create(order.clone()) {
            error!(order_id = %order.order_id, error = %e, "stock deducted but order could not be saved");
            return Err(e.into());
        }

        info!(order_id = %order.order_id, "order created");
        Ok(order)
    }

    #[instrument(skip(self), err)]
    pub fn get_order(&self, id: &OrderId) -> Result<Order, ServiceError> {
        self.repo
            .get_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(Order::KIND, id))
    }

    #[instrument(skip(self), err)]
    pub fn get_all_orders(&self) -> Result<Vec<Order>, ServiceError> {
        Ok(self.repo.get_all()?)
    }

    /// Replace customer name and items. Inventory is not re-checked or adjusted.
    #[instrument(skip(self, draft), err)]
    pub fn update_order(&self, id: &OrderId, draft: OrderDraft) -> Result<Order, ServiceError> {
        let draft = draft.validate_and_normalize()?;

        let updated = self
            .repo
            .update_with(id, |order| {
                order.revise(draft);
                order.clone()
            })?
            .ok_or_else(|| ServiceError::not_found(Order::KIND, id))?;

        info!(order_id = %id, "order updated");
        Ok(updated)
    }

    /// Removes the order. Deducted stock is not returned.
    #[instrument(skip(self), err)]
    pub fn delete_order(&self, id: &OrderId) -> Result<(), ServiceError> {
        if !self.repo.delete(id)? {
            return Err(ServiceError::not_found(Order::KIND, id));
        }
        info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Mark the order closed. Closing a closed order succeeds and changes nothing.
    #[instrument(skip(self), err)]
    pub fn close_order(&self, id: &OrderId) -> Result<Order, ServiceError> {
        let (changed, order) = self
            .repo
            .update_with(id, |order| (order.close(), order.clone()))?
            .ok_or_else(|| ServiceError::not_found(Order::KIND, id))?;

        if changed {
            info!(order_id = %id, "order closed");
        }
        Ok(order)
    }
}

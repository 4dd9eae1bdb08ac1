use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{instrument, warn};

use hotcoffee_inventory::InventoryItem;
use hotcoffee_menu::MenuItem;
use hotcoffee_orders::{Order, PopularItem, SalesReport};

use crate::store::CollectionStore;

use super::{MenuService, OrderService, ServiceError};

/// Number of entries in the popular items report when none is requested.
pub const DEFAULT_POPULAR_LIMIT: usize = 5;

/// Read-only aggregations over orders, priced and named from the current menu.
pub struct ReportService<OS, MS, IS> {
    orders: Arc<OrderService<OS, MS, IS>>,
    menu: Arc<MenuService<MS, IS>>,
}

impl<OS, MS, IS> ReportService<OS, MS, IS>
where
    OS: CollectionStore<Order>,
    MS: CollectionStore<MenuItem>,
    IS: CollectionStore<InventoryItem>,
{
    pub fn new(orders: Arc<OrderService<OS, MS, IS>>, menu: Arc<MenuService<MS, IS>>) -> Self {
        Self { orders, menu }
    }

    #[instrument(skip(self), err)]
    pub fn total_sales(&self) -> Result<SalesReport, ServiceError> {
        let orders = self.orders.get_all_orders()?;
        let prices: HashMap<_, _> = self
            .menu
            .get_all_menu_items()?
            .into_iter()
            .map(|m| (m.product_id, m.price))
            .collect();

        let report = SalesReport::from_orders(&orders, |id| prices.get(id).copied(), Utc::now());
        if !report.unpriced_products.is_empty() {
            warn!(
                products = ?report.unpriced_products,
                "sold products missing from the menu; excluded from revenue"
            );
        }
        Ok(report)
    }

    #[instrument(skip(self), err)]
    pub fn popular_items(&self, limit: usize) -> Result<Vec<PopularItem>, ServiceError> {
        let orders = self.orders.get_all_orders()?;
        let names: HashMap<_, _> = self
            .menu
            .get_all_menu_items()?
            .into_iter()
            .map(|m| (m.product_id, m.name))
            .collect();

        Ok(PopularItem::rank(&orders, |id| names.get(id).cloned(), limit))
    }
}

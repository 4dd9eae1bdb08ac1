//! Application services.
//!
//! Services validate input, enforce uniqueness and existence, and coordinate
//! inventory, menu and orders. They are synchronous; callers on an async
//! runtime should run them on a blocking thread.

pub mod error;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod reports;

use std::sync::Arc;

use hotcoffee_inventory::InventoryItem;
use hotcoffee_menu::MenuItem;
use hotcoffee_orders::Order;

use crate::config::StorageConfig;
use crate::repository::CollectionRepository;
use crate::store::{CollectionStore, JsonFileStore, StoreError};

pub use error::ServiceError;
pub use inventory::{Demand, InventoryService, StockReservation};
pub use menu::MenuService;
pub use orders::OrderService;
pub use reports::{DEFAULT_POPULAR_LIMIT, ReportService};

/// The full service graph over one set of stores.
pub struct ShopServices<OS, MS, IS> {
    pub inventory: Arc<InventoryService<IS>>,
    pub menu: Arc<MenuService<MS, IS>>,
    pub orders: Arc<OrderService<OS, MS, IS>>,
    pub reports: Arc<ReportService<OS, MS, IS>>,
}

/// Services backed by JSON documents on disk.
pub type FileShopServices = ShopServices<JsonFileStore<Order>, JsonFileStore<MenuItem>, JsonFileStore<InventoryItem>>;

impl<OS, MS, IS> ShopServices<OS, MS, IS>
where
    OS: CollectionStore<Order>,
    MS: CollectionStore<MenuItem>,
    IS: CollectionStore<InventoryItem>,
{
    pub fn new(order_store: OS, menu_store: MS, inventory_store: IS) -> Self {
        let inventory = Arc::new(InventoryService::new(CollectionRepository::new(inventory_store)));
        let menu = Arc::new(MenuService::new(
            CollectionRepository::new(menu_store),
            Arc::clone(&inventory),
        ));
        let orders = Arc::new(OrderService::new(
            CollectionRepository::new(order_store),
            Arc::clone(&menu),
            Arc::clone(&inventory),
        ));
        let reports = Arc::new(ReportService::new(Arc::clone(&orders), Arc::clone(&menu)));

        Self {
            inventory,
            menu,
            orders,
            reports,
        }
    }
}

impl FileShopServices {
    /// Open (and initialize when missing) the three documents under the data directory.
    pub fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        Ok(Self::new(
            JsonFileStore::open(config.orders_path())?,
            JsonFileStore::open(config.menu_path())?,
            JsonFileStore::open(config.inventory_path())?,
        ))
    }
}

impl<OS, MS, IS> Clone for ShopServices<OS, MS, IS> {
    fn clone(&self) -> Self {
        Self {
            inventory: Arc::clone(&self.inventory),
            menu: Arc::clone(&self.menu),
            orders: Arc::clone(&self.orders),
            reports: Arc::clone(&self.reports),
        }
    }
}

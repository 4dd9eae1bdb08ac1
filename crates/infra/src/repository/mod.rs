//! Entity-level access to a collection store.
//!
//! Each call reads the current collection, applies one change and writes the
//! whole collection back inside a single store critical section.

use std::marker::PhantomData;

use tracing::debug;

use hotcoffee_core::Entity;
use hotcoffee_inventory::InventoryItem;
use hotcoffee_menu::MenuItem;
use hotcoffee_orders::Order;

use crate::store::{CollectionStore, StoreError};

pub type InventoryRepository<S> = CollectionRepository<InventoryItem, S>;
pub type MenuRepository<S> = CollectionRepository<MenuItem, S>;
pub type OrderRepository<S> = CollectionRepository<Order, S>;

/// Id-based CRUD over a whole-collection store.
///
/// Repositories do not enforce uniqueness on `create`; services decide whether
/// a duplicate is an error (see `insert_if_absent`).
#[derive(Debug)]
pub struct CollectionRepository<E, S> {
    store: S,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> CollectionRepository<E, S>
where
    E: Entity + Clone,
    S: CollectionStore<E>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Append the entity.
    pub fn create(&self, entity: E) -> Result<(), StoreError> {
        debug!(kind = E::KIND, id = %entity.id(), "create");
        self.store.modify(|items| {
            items.push(entity);
            Ok(())
        })
    }

    /// Append the entity unless one with the same id exists. Returns whether it was added.
    pub fn insert_if_absent(&self, entity: E) -> Result<bool, StoreError> {
        debug!(kind = E::KIND, id = %entity.id(), "insert if absent");
        self.store.modify(|items| {
            if items.iter().any(|e| e.id() == entity.id()) {
                return Ok(false);
            }
            items.push(entity);
            Ok(true)
        })
    }

    pub fn get_by_id(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        Ok(self.store.retrieve()?.into_iter().find(|e| e.id() == id))
    }

    /// All entities in storage order.
    pub fn get_all(&self) -> Result<Vec<E>, StoreError> {
        self.store.retrieve()
    }

    /// Replace the first entity with the same id. Returns `false` (and changes
    /// nothing) if there is none.
    pub fn update(&self, entity: E) -> Result<bool, StoreError> {
        debug!(kind = E::KIND, id = %entity.id(), "update");
        self.store.modify(|items| {
            match items.iter_mut().find(|e| e.id() == entity.id()) {
                Some(slot) => {
                    *slot = entity;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    /// Mutate the entity with `id` in place. `None` if it does not exist.
    pub fn update_with<R, F>(&self, id: &E::Id, f: F) -> Result<Option<R>, StoreError>
    where
        F: FnOnce(&mut E) -> R,
    {
        debug!(kind = E::KIND, id = %id, "update in place");
        self.store
            .modify(|items| Ok(items.iter_mut().find(|e| e.id() == id).map(f)))
    }

    /// Remove the first entity with `id`. Collection order is not preserved:
    /// the last element takes the removed slot.
    pub fn delete(&self, id: &E::Id) -> Result<bool, StoreError> {
        debug!(kind = E::KIND, id = %id, "delete");
        self.store.modify(|items| {
            match items.iter().position(|e| e.id() == id) {
                Some(idx) => {
                    items.swap_remove(idx);
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    /// Run an arbitrary read-modify-write over the whole collection atomically.
    pub fn modify<R, Er, F>(&self, f: F) -> Result<R, Er>
    where
        F: FnOnce(&mut Vec<E>) -> Result<R, Er>,
        Er: From<StoreError>,
    {
        self.store.modify(f)
    }
}

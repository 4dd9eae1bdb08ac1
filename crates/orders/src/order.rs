use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hotcoffee_core::validate::normalize_name;
use hotcoffee_core::{DomainError, DomainResult, Entity, OrderId, ProductId};

/// Order status lifecycle.
///
/// `Pending` is the only initial state and `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Closed,
}

/// Order line: product and number of units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl OrderItem {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Client-supplied part of an order (create and update payloads).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_name: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl OrderDraft {
    pub fn new(customer_name: impl Into<String>, items: Vec<OrderItem>) -> Self {
        Self {
            customer_name: customer_name.into(),
            items,
        }
    }

    /// Structural validation; runs before any storage access.
    pub fn validate_and_normalize(self) -> DomainResult<Self> {
        let customer_name = normalize_name("customer_name", &self.customer_name)?;

        if self.items.is_empty() {
            return Err(DomainError::validation("order must contain at least one item"));
        }

        let mut items = Vec::with_capacity(self.items.len());
        for item in self.items {
            if item.quantity == 0 {
                return Err(DomainError::validation(format!(
                    "quantity for {} must be a positive integer",
                    item.product_id
                )));
            }
            items.push(OrderItem {
                product_id: item.product_id.normalized()?,
                quantity: item.quantity,
            });
        }

        Ok(Self {
            customer_name,
            items,
        })
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Open a new pending order from an already validated draft.
    pub fn open(order_id: OrderId, draft: OrderDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            order_id,
            customer_name: draft.customer_name,
            items: draft.items,
            status: OrderStatus::Pending,
            created_at,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.status, OrderStatus::Closed)
    }

    /// Transition to `closed`. Returns `false` if the order was already closed,
    /// in which case nothing changes.
    pub fn close(&mut self) -> bool {
        if self.is_closed() {
            return false;
        }
        self.status = OrderStatus::Closed;
        true
    }

    /// Replace the client-supplied fields; id, status and creation time stay.
    pub fn revise(&mut self, draft: OrderDraft) {
        self.customer_name = draft.customer_name;
        self.items = draft.items;
    }

    /// Units ordered per product (lines for the same product are summed).
    pub fn units_by_product(&self) -> BTreeMap<&ProductId, u64> {
        let mut units = BTreeMap::new();
        for item in &self.items {
            *units.entry(&item.product_id).or_insert(0) += u64::from(item.quantity);
        }
        units
    }
}

impl Entity for Order {
    type Id = OrderId;

    const KIND: &'static str = "order";

    fn id(&self) -> &Self::Id {
        &self.order_id
    }
}

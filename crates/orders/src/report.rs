//! Aggregations over order history (sales totals, popular products).
//!
//! Prices and names live on the menu, so callers pass lookups in; nothing here
//! touches storage.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hotcoffee_core::ProductId;

use crate::order::Order;

/// Revenue and volume over closed orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub total_revenue: f64,
    pub total_items_sold: u64,
    pub generated_at: DateTime<Utc>,
    /// Sold products that are no longer on the menu (counted as items, not revenue).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unpriced_products: Vec<ProductId>,
}

impl SalesReport {
    /// Only closed orders count as sales.
    pub fn from_orders<'a, I, F>(orders: I, price_of: F, generated_at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
        F: Fn(&ProductId) -> Option<f64>,
    {
        let mut total_revenue = 0.0;
        let mut total_items_sold = 0u64;
        let mut unpriced = BTreeSet::new();

        for order in orders.into_iter().filter(|o| o.is_closed()) {
            for item in &order.items {
                total_items_sold += u64::from(item.quantity);
                match price_of(&item.product_id) {
                    Some(price) => total_revenue += price * f64::from(item.quantity),
                    None => {
                        unpriced.insert(item.product_id.clone());
                    }
                }
            }
        }

        Self {
            total_revenue,
            total_items_sold,
            generated_at,
            unpriced_products: unpriced.into_iter().collect(),
        }
    }
}

/// A product and how many units of it were ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity_sold: u64,
}

impl PopularItem {
    /// Rank products by ordered units across all orders, most popular first.
    ///
    /// Ties are broken by product id so the ranking is stable. Products missing
    /// from `name_of` are reported under their id.
    pub fn rank<'a, I, F>(orders: I, name_of: F, limit: usize) -> Vec<PopularItem>
    where
        I: IntoIterator<Item = &'a Order>,
        F: Fn(&ProductId) -> Option<String>,
    {
        let mut totals: BTreeMap<&ProductId, u64> = BTreeMap::new();
        for order in orders {
            for (product_id, units) in order.units_by_product() {
                *totals.entry(product_id).or_insert(0) += units;
            }
        }

        let mut ranked: Vec<(&ProductId, u64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        ranked
            .into_iter()
            .take(limit)
            .map(|(product_id, quantity_sold)| PopularItem {
                name: name_of(product_id).unwrap_or_else(|| product_id.to_string()),
                product_id: product_id.clone(),
                quantity_sold,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{OrderDraft, OrderItem};
    use hotcoffee_core::OrderId;
    use proptest::prelude::*;

    fn pid(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    fn order(items: &[(&str, u32)], closed: bool) -> Order {
        let lines = items.iter().map(|(p, q)| OrderItem::new(pid(p), *q)).collect();
        let mut order = Order::open(
            OrderId::generate("Test Customer"),
            OrderDraft::new("Test Customer", lines),
            Utc::now(),
        );
        if closed {
            order.close();
        }
        order
    }

    fn price_of(id: &ProductId) -> Option<f64> {
        match id.as_str() {
            "latte" => Some(3.5),
            "mocha" => Some(4.0),
            _ => None,
        }
    }

    #[test]
    fn sales_count_only_closed_orders() {
        let orders = vec![
            order(&[("latte", 2)], true),
            order(&[("mocha", 5)], false),
            order(&[("mocha", 1), ("latte", 1)], true),
        ];

        let report = SalesReport::from_orders(&orders, price_of, Utc::now());

        assert_eq!(report.total_items_sold, 4);
        assert!((report.total_revenue - (3.5 * 3.0 + 4.0)).abs() < 1e-9);
        assert!(report.unpriced_products.is_empty());
    }

    #[test]
    fn sales_report_lists_products_without_price() {
        let orders = vec![order(&[("retired_blend", 2), ("latte", 1)], true)];

        let report = SalesReport::from_orders(&orders, price_of, Utc::now());

        assert_eq!(report.total_items_sold, 3);
        assert_eq!(report.unpriced_products, vec![pid("retired_blend")]);
        assert!((report.total_revenue - 3.5).abs() < 1e-9);
    }

    #[test]
    fn popular_items_rank_by_units_then_id() {
        let orders = vec![
            order(&[("latte", 2), ("mocha", 1)], false),
            order(&[("americano", 3)], true),
            order(&[("mocha", 2)], true),
        ];

        let ranked = PopularItem::rank(&orders, |id| Some(id.as_str().to_uppercase()), 10);
        let ids: Vec<&str> = ranked.iter().map(|p| p.product_id.as_str()).collect();

        assert_eq!(ids, vec!["americano", "mocha", "latte"]);
        assert_eq!(ranked[0].quantity_sold, 3);
        assert_eq!(ranked[0].name, "AMERICANO");
    }

    #[test]
    fn popular_items_respect_limit_and_fall_back_to_id() {
        let orders = vec![order(&[("latte", 1), ("mocha", 2)], false)];

        let ranked = PopularItem::rank(&orders, |_| None, 1);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "mocha");
    }

    proptest! {
        /// Property: items sold equals the sum of closed-order quantities.
        #[test]
        fn items_sold_matches_closed_quantities(
            lines in proptest::collection::vec((1u32..20, any::<bool>()), 0..20)
        ) {
            let orders: Vec<Order> = lines
                .iter()
                .map(|(q, closed)| order(&[("latte", *q)], *closed))
                .collect();
            let expected: u64 = lines.iter().filter(|(_, c)| *c).map(|(q, _)| u64::from(*q)).sum();

            let report = SalesReport::from_orders(&orders, price_of, Utc::now());
            prop_assert_eq!(report.total_items_sold, expected);
        }
    }
}

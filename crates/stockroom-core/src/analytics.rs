//! # Analytics
//!
//! Group-and-sum folds behind the dashboard views.
//!
//! ```text
//! ┌───────────────────────┐      ┌──────────────────────────────────────┐
//! │  list_items()         │ ───► │ stock_by_category   category → units │
//! │                       │      │ value_by_category   category → value │
//! │                       │      │ price_distribution  price → #items   │
//! │                       │      │ summarize           totals           │
//! ├───────────────────────┤      ├──────────────────────────────────────┤
//! │  list_sales()         │ ───► │ daily_revenue       date → revenue   │
//! └───────────────────────┘      └──────────────────────────────────────┘
//! ```
//!
//! All functions are pure and return ordered maps, so callers can render
//! them without sorting again.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::money::Money;
use crate::types::{Category, InventoryItem, SaleHistoryRow};

/// Revenue per UTC calendar day.
///
/// Each sale contributes `quantity × sale_price`.
pub fn daily_revenue(sales: &[SaleHistoryRow]) -> BTreeMap<NaiveDate, Money> {
    sales.iter().fold(BTreeMap::new(), |mut acc, sale| {
        *acc.entry(sale.sale_date.date_naive()).or_default() += sale.line_total();
        acc
    })
}

/// Units on hand per category. Categories with no items are omitted.
pub fn stock_by_category(items: &[InventoryItem]) -> BTreeMap<Category, i64> {
    items.iter().fold(BTreeMap::new(), |mut acc, item| {
        let units = acc.entry(item.category).or_insert(0);
        *units = units.saturating_add(item.quantity);
        acc
    })
}

/// Stock value (`quantity × price`) per category.
pub fn value_by_category(items: &[InventoryItem]) -> BTreeMap<Category, Money> {
    items.iter().fold(BTreeMap::new(), |mut acc, item| {
        *acc.entry(item.category).or_default() += item.total_value();
        acc
    })
}

/// Number of items listed at each unit price.
pub fn price_distribution(items: &[InventoryItem]) -> BTreeMap<Money, usize> {
    items.iter().fold(BTreeMap::new(), |mut acc, item| {
        *acc.entry(item.price()).or_default() += 1;
        acc
    })
}

/// Items whose quantity is below their threshold, in input order.
pub fn low_stock_items(items: &[InventoryItem]) -> Vec<InventoryItem> {
    items
        .iter()
        .filter(|item| item.is_low_stock())
        .cloned()
        .collect()
}

/// Headline figures for the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InventorySummary {
    /// Distinct items.
    pub item_count: usize,
    /// Sum of quantities.
    pub unit_count: i64,
    /// Sum of `quantity × price`.
    pub total_value: Money,
    /// Items below their threshold.
    pub low_stock_count: usize,
}

/// Computes the headline figures in one pass.
pub fn summarize(items: &[InventoryItem]) -> InventorySummary {
    items
        .iter()
        .fold(InventorySummary::default(), |mut summary, item| {
            summary.item_count += 1;
            summary.unit_count = summary.unit_count.saturating_add(item.quantity);
            summary.total_value += item.total_value();
            if item.is_low_stock() {
                summary.low_stock_count += 1;
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(id: i64, category: Category, quantity: i64, price_cents: i64) -> InventoryItem {
        InventoryItem {
            id,
            item: format!("item-{id}"),
            category,
            quantity,
            price_cents,
            min_stock: 5,
        }
    }

    fn sale(sale_id: i64, day: u32, hour: u32, quantity: i64, price_cents: i64) -> SaleHistoryRow {
        SaleHistoryRow {
            sale_id,
            item_id: 1,
            item_name: "Rice".to_string(),
            quantity,
            sale_price_cents: price_cents,
            sale_date: Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
        }
    }

    fn shelf() -> Vec<InventoryItem> {
        vec![
            item(1, Category::Groceries, 10, 50_000),
            item(2, Category::Groceries, 2, 120_000),
            item(3, Category::Spices, 500, 300),
            item(4, Category::Protein, 4, 350_000),
        ]
    }

    #[test]
    fn test_daily_revenue_groups_by_date() {
        let sales = vec![
            sale(1, 1, 9, 3, 48_000),
            sale(2, 1, 23, 1, 50_000),
            sale(3, 2, 0, 2, 50_000),
        ];

        let revenue = daily_revenue(&sales);
        let days: Vec<_> = revenue.keys().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2024-03-01", "2024-03-02"]);
        assert_eq!(revenue.values().next().unwrap().cents(), 194_000);
        assert_eq!(revenue.values().nth(1).unwrap().cents(), 100_000);
    }

    #[test]
    fn test_daily_revenue_empty() {
        assert!(daily_revenue(&[]).is_empty());
    }

    #[test]
    fn test_stock_by_category() {
        let stock = stock_by_category(&shelf());
        assert_eq!(stock[&Category::Groceries], 12);
        assert_eq!(stock[&Category::Spices], 500);
        assert!(!stock.contains_key(&Category::Juice));
    }

    #[test]
    fn test_value_by_category() {
        let value = value_by_category(&shelf());
        assert_eq!(value[&Category::Groceries].cents(), 10 * 50_000 + 2 * 120_000);
        assert_eq!(value[&Category::Protein].cents(), 1_400_000);
    }

    #[test]
    fn test_price_distribution() {
        let mut items = shelf();
        items.push(item(5, Category::Other, 1, 50_000));

        let dist = price_distribution(&items);
        assert_eq!(dist[&Money::from_cents(50_000)], 2);
        assert_eq!(dist[&Money::from_cents(300)], 1);
        assert_eq!(dist.values().sum::<usize>(), 5);
    }

    #[test]
    fn test_low_stock_items_filter() {
        let low = low_stock_items(&shelf());
        let ids: Vec<_> = low.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&shelf());
        assert_eq!(summary.item_count, 4);
        assert_eq!(summary.unit_count, 516);
        assert_eq!(
            summary.total_value.cents(),
            500_000 + 240_000 + 150_000 + 1_400_000
        );
        assert_eq!(summary.low_stock_count, 2);

        assert_eq!(summarize(&[]), InventorySummary::default());
    }

    #[test]
    fn test_oversized_rows_saturate() {
        let items = vec![
            item(1, Category::Other, 100_000_000_000_000_000, 100_000),
            item(2, Category::Other, i64::MAX, 1),
        ];

        let summary = summarize(&items);
        assert_eq!(summary.unit_count, i64::MAX);
        assert_eq!(summary.total_value, Money::from_cents(i64::MAX));
        assert_eq!(stock_by_category(&items)[&Category::Other], i64::MAX);
        assert_eq!(value_by_category(&items)[&Category::Other], Money::from_cents(i64::MAX));
    }
}

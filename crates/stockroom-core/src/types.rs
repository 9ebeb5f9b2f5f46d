//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InventoryItem   │   │      Sale       │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │◄──│  item_id (FK)   │   │  username (PK)  │       │
//! │  │  item           │   │  quantity       │   │  password_hash  │       │
//! │  │  category       │   │  sale_price     │   │  created_at     │       │
//! │  │  quantity       │   │  sale_date      │   └─────────────────┘       │
//! │  │  price_cents    │   └─────────────────┘                              │
//! │  │  min_stock      │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │ SaleHistoryRow  │   │    Category     │       │
//! │                        │  sale ⋈ item    │   │  closed enum    │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Items and sales use integer surrogate keys assigned by SQLite
//! (`INTEGER PRIMARY KEY AUTOINCREMENT`), so ids are never reused after a
//! delete. Users are keyed by their username.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// The shelf category an item belongs to.
///
/// Stored as its lowercase key (`"spices"`), shown with its unit
/// (`"spices (g)"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Meat, fish, eggs. Weighed in kilograms.
    Protein,
    /// Fresh produce. Weighed in kilograms.
    Perishables,
    /// Counted per bottle.
    Juice,
    /// Weighed in grams.
    Spices,
    /// Dry goods. Weighed in kilograms.
    Groceries,
    /// Anything else.
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 6] = [
        Category::Protein,
        Category::Perishables,
        Category::Juice,
        Category::Spices,
        Category::Groceries,
        Category::Other,
    ];

    /// The storage key.
    pub const fn key(&self) -> &'static str {
        match self {
            Category::Protein => "protein",
            Category::Perishables => "perishables",
            Category::Juice => "juice",
            Category::Spices => "spices",
            Category::Groceries => "groceries",
            Category::Other => "other",
        }
    }

    /// The display label including the unit stock is counted in.
    pub const fn label(&self) -> &'static str {
        match self {
            Category::Protein => "protein (kg)",
            Category::Perishables => "perishables (kg)",
            Category::Juice => "juice (bottle)",
            Category::Spices => "spices (g)",
            Category::Groceries => "groceries (kg)",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Case-insensitive on the storage key.
///
/// ```rust
/// use stockroom_core::Category;
///
/// assert_eq!("Spices".parse::<Category>().unwrap(), Category::Spices);
/// assert!("bakery".parse::<Category>().is_err());
/// ```
impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: Category::ALL.iter().map(|c| c.key().to_string()).collect(),
            })
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A stock line on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryItem {
    /// Surrogate key, assigned on insert.
    pub id: i64,

    /// Display name.
    pub item: String,

    pub category: Category,

    /// Units on hand. Never negative.
    pub quantity: i64,

    /// Unit price in minor units.
    pub price_cents: i64,

    /// Low-stock threshold.
    pub min_stock: i64,
}

impl InventoryItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Value of the units on hand (`quantity × price`).
    #[inline]
    pub fn total_value(&self) -> Money {
        self.price() * self.quantity
    }

    /// True when stock has fallen below the item's threshold.
    ///
    /// ```rust
    /// use stockroom_core::{Category, InventoryItem};
    ///
    /// let mut rice = InventoryItem {
    ///     id: 1,
    ///     item: "Rice".into(),
    ///     category: Category::Groceries,
    ///     quantity: 5,
    ///     price_cents: 50000,
    ///     min_stock: 5,
    /// };
    /// assert!(!rice.is_low_stock());
    /// rice.quantity = 4;
    /// assert!(rice.is_low_stock());
    /// ```
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.min_stock
    }
}

/// The mutable fields of an item, as entered by the operator.
///
/// Used for both add and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub item: String,
    pub category: Category,
    pub quantity: i64,
    pub price: Money,
    pub min_stock: i64,
}

impl NewItem {
    /// Creates an item with the default low-stock threshold.
    pub fn new(item: impl Into<String>, category: Category, quantity: i64, price: Money) -> Self {
        Self {
            item: item.into(),
            category,
            quantity,
            price,
            min_stock: crate::DEFAULT_MIN_STOCK,
        }
    }

    /// Overrides the low-stock threshold.
    pub fn with_min_stock(mut self, min_stock: i64) -> Self {
        self.min_stock = min_stock;
        self
    }
}

// =============================================================================
// User
// =============================================================================

/// An operator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub username: String,

    /// PHC-format digest; the plaintext is never stored.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub item_id: i64,
    /// Units sold. Always positive.
    pub quantity: i64,
    /// Unit price charged, in minor units.
    pub sale_price_cents: i64,
    /// UTC, whole seconds.
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    /// Returns the unit sale price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Revenue of this sale (`quantity × sale_price`).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.sale_price() * self.quantity
    }
}

// =============================================================================
// Sale History
// =============================================================================

/// One row of the sales history: a sale joined with its item's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleHistoryRow {
    pub sale_id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub sale_price_cents: i64,
    pub sale_date: DateTime<Utc>,
}

impl SaleHistoryRow {
    /// Returns the unit sale price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Revenue of this sale (`quantity × sale_price`).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.sale_price() * self.quantity
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(quantity: i64, min_stock: i64) -> InventoryItem {
        InventoryItem {
            id: 7,
            item: "Chicken".to_string(),
            category: Category::Protein,
            quantity,
            price_cents: 350_000,
            min_stock,
        }
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("protein".parse::<Category>().unwrap(), Category::Protein);
        assert_eq!(" JUICE ".parse::<Category>().unwrap(), Category::Juice);
        assert_eq!("Other".parse::<Category>().unwrap(), Category::Other);
    }

    #[test]
    fn test_category_parse_lists_allowed_values() {
        let err = "juice(bottle)".parse::<Category>().unwrap_err();
        match err {
            ValidationError::NotAllowed { field, allowed } => {
                assert_eq!(field, "category");
                assert_eq!(allowed.len(), 6);
                assert!(allowed.contains(&"groceries".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_category_labels_carry_units() {
        assert_eq!(Category::Spices.to_string(), "spices (g)");
        assert_eq!(Category::Juice.label(), "juice (bottle)");
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_serde_uses_key() {
        let json = serde_json::to_string(&Category::Perishables).unwrap();
        assert_eq!(json, "\"perishables\"");
    }

    #[test]
    fn test_item_total_value() {
        let chicken = item(4, 5);
        assert_eq!(chicken.price().cents(), 350_000);
        assert_eq!(chicken.total_value().cents(), 1_400_000);
    }

    #[test]
    fn test_low_stock_boundary() {
        assert!(item(0, 5).is_low_stock());
        assert!(item(4, 5).is_low_stock());
        assert!(!item(5, 5).is_low_stock());
        assert!(!item(6, 5).is_low_stock());
    }

    #[test]
    fn test_new_item_defaults_min_stock() {
        let rice = NewItem::new("Rice", Category::Groceries, 10, Money::from_cents(50_000));
        assert_eq!(rice.min_stock, crate::DEFAULT_MIN_STOCK);
        assert_eq!(rice.with_min_stock(2).min_stock, 2);
    }

    #[test]
    fn test_sale_line_total() {
        let sale = Sale {
            id: 1,
            item_id: 7,
            quantity: 3,
            sale_price_cents: 48_000,
            sale_date: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        };
        assert_eq!(sale.line_total().cents(), 144_000);
    }

    #[test]
    fn test_user_never_serializes_digest() {
        let user = User {
            username: "admin".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
    }
}

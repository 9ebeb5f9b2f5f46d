//! # stockroom-core
//!
//! The inventory dashboard's domain: items, sales, money, and the rules
//! that decide what may be stored. Nothing in here opens a file or a
//! connection, so every function can be tested without a database.
//!
//! ```text
//!   apps/console  (shell, commands, config, session)
//!        │
//!        ├──────────────► stockroom-db  (SQLite repositories)
//!        │                     │
//!        ▼                     ▼
//!   stockroom-core ◄───────────┘
//!     types       InventoryItem, NewItem, Sale, SaleHistoryRow, Category, User
//!     money       Money in minor units
//!     validation  checks run before any write
//!     password    Argon2id digests
//!     analytics   per-category and per-day folds
//!     export      text table and CSV snapshots
//! ```
//!
//! ```rust
//! use stockroom_core::validation::validate_new_item;
//! use stockroom_core::{Category, Money, NewItem};
//!
//! let rice = NewItem::new("Rice", Category::Groceries, 10, Money::from_major(500));
//! assert!(validate_new_item(&rice).is_ok());
//! ```

pub mod analytics;
pub mod error;
pub mod export;
pub mod money;
pub mod password;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Low-stock threshold for items added without one.
pub const DEFAULT_MIN_STOCK: i64 = 5;

pub const MAX_ITEM_NAME_LEN: usize = 200;

/// Largest quantity accepted for stock or a sale.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Largest unit price accepted, in minor units (10,000,000.00).
///
/// `MAX_QUANTITY × MAX_PRICE_CENTS` stays below `i64::MAX`, so a single
/// line's value always fits.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Shortest password accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 8;

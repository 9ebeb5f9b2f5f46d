//! # Repositories
//!
//! One struct per table, each owning a clone of the pool. Commands reach
//! them through `Database::users()`, `items()` and `sales()`.
//!
//! | Repository | Table | Notes |
//! |---|---|---|
//! | [`UserRepository`](user::UserRepository) | `users` | lookup by username, idempotent bootstrap |
//! | [`ItemRepository`](item::ItemRepository) | `inventory` | CRUD; delete refuses items with sales |
//! | [`SaleRepository`](sale::SaleRepository) | `sales` | stock decrement and insert in one transaction |
//!
//! All SQL is bound with `?N` placeholders; no statement is built from
//! operator text.
//!
//! ## Query Style
//! Statements use runtime `sqlx::query` / `query_as::<_, T>` with `FromRow`
//! mapping rather than the `query!` / `query_as!` macros. The build then
//! needs no `DATABASE_URL` and no `.sqlx` offline cache. The cost is that a
//! column or type mismatch surfaces when the statement runs, not at compile
//! time. Every repository method has a test against a migrated in-memory
//! database.

pub mod item;
pub mod sale;
pub mod user;

use chrono::{DateTime, Utc};

/// Text form of every stored timestamp (UTC, whole seconds).
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp for storage.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-01 09:05:07");
    }
}

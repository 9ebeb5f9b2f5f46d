//! # Database Error Types
//!
//! Everything a repository call can fail with.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error                                                           │
//! │     │                                                                   │
//! │     ├── "UNIQUE constraint failed: users.username"  ──► Duplicate      │
//! │     ├── "FOREIGN KEY constraint failed"             ──► ForeignKey     │
//! │     ├── "CHECK constraint failed: ..."              ──► Check          │
//! │     ├── PoolTimedOut / PoolClosed / Io               ──► Connection     │
//! │     └── anything else                                ──► Storage        │
//! │                                                                         │
//! │  Raised by repositories directly:                                      │
//! │     NotFound, InsufficientStock, ItemHasSales, Transaction             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `is_recoverable` separates outcomes an operator can act on from failures
//! of the store itself.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row with that id.
    ///
    /// ## When This Occurs
    /// - Updating, deleting or selling an item id that was never assigned
    ///   or has been deleted
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A unique key already holds this value.
    ///
    /// ## When This Occurs
    /// - Signing up with a username that is taken
    #[error("{field} '{value}' is already taken")]
    Duplicate { field: String, value: String },

    /// Not enough units on hand for a sale. Nothing was written.
    #[error("Insufficient stock for item {item_id}: {available} available, {requested} requested")]
    InsufficientStock {
        item_id: i64,
        available: i64,
        requested: i64,
    },

    /// The item is referenced by sales. Nothing was deleted.
    #[error("Item {id} has {sales} recorded sale(s) and cannot be deleted")]
    ItemHasSales { id: i64, sales: i64 },

    /// A `sales.item_id` reference would dangle.
    #[error("Foreign key constraint failed: {0}")]
    ForeignKey(String),

    /// A column CHECK rejected the row (negative quantity, unknown category).
    ///
    /// Input validation normally catches these first.
    #[error("Check constraint failed: {0}")]
    Check(String),

    /// The database file could not be opened, or the pool is gone.
    #[error("Database unavailable: {0}")]
    Connection(String),

    /// Applying the embedded schema failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A transaction could not be committed.
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Any other statement failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True for outcomes caused by the request rather than the store.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DbError::NotFound { .. }
                | DbError::Duplicate { .. }
                | DbError::InsufficientStock { .. }
                | DbError::ItemHasSales { .. }
        )
    }
}

/// Splits SQLite's "<KIND> constraint failed: <detail>" message.
fn constraint_failure(message: &str) -> Option<(&str, &str)> {
    let (kind, detail) = message.split_once(" constraint failed")?;
    Some((kind, detail.trim_start_matches(':').trim()))
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                match constraint_failure(message) {
                    // "users.username" -> "username"
                    Some(("UNIQUE", column)) => DbError::Duplicate {
                        field: column.rsplit('.').next().unwrap_or(column).to_string(),
                        value: String::new(),
                    },
                    Some(("FOREIGN KEY", _)) => DbError::ForeignKey(message.to_string()),
                    Some(("CHECK", detail)) => DbError::Check(detail.to_string()),
                    _ => DbError::Storage(message.to_string()),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::Connection("timed out waiting for a connection".into()),
            sqlx::Error::PoolClosed => DbError::Connection("pool is closed".into()),
            sqlx::Error::Io(e) => DbError::Connection(e.to_string()),
            other => DbError::Storage(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let err = DbError::not_found("Item", 42);
        assert_eq!(err.to_string(), "Item not found: 42");

        let err = DbError::duplicate("username", "admin");
        assert_eq!(err.to_string(), "username 'admin' is already taken");
    }

    #[test]
    fn test_constraint_failure_parsing() {
        assert_eq!(
            constraint_failure("UNIQUE constraint failed: users.username"),
            Some(("UNIQUE", "users.username"))
        );
        assert_eq!(
            constraint_failure("FOREIGN KEY constraint failed"),
            Some(("FOREIGN KEY", ""))
        );
        assert_eq!(
            constraint_failure("CHECK constraint failed: quantity >= 0"),
            Some(("CHECK", "quantity >= 0"))
        );
        assert_eq!(constraint_failure("no such table: widgets"), None);
    }

    #[test]
    fn test_pool_errors_are_connection_errors() {
        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::Connection(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_recoverable_outcomes() {
        assert!(DbError::not_found("Item", 1).is_recoverable());
        assert!(DbError::ItemHasSales { id: 1, sales: 2 }.is_recoverable());
        assert!(!DbError::Storage("disk I/O error".into()).is_recoverable());
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = DbError::InsufficientStock {
            item_id: 3,
            available: 2,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for item 3: 2 available, 5 requested"
        );
    }
}

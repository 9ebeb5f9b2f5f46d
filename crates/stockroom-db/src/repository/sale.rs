//! # Sale Repository
//!
//! Database operations for sales.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       record(item_id, qty, price)                       │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    UPDATE inventory SET quantity = quantity - qty                      │
//! │     WHERE id = item_id AND quantity >= qty                             │
//! │       │                                                                 │
//! │       ├── 0 rows: item missing?  ──► NotFound          (rollback)      │
//! │       │           otherwise      ──► InsufficientStock (rollback)      │
//! │       ▼                                                                 │
//! │    INSERT INTO sales (...) stamped with UTC now, whole seconds          │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The decrement is conditional inside SQLite, so two sales racing for   │
//! │  the last units cannot both succeed.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{SubsecRound, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::format_timestamp;
use stockroom_core::{Sale, SaleHistoryRow};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale and decrements stock in one transaction.
    ///
    /// ## Arguments
    /// * `item_id` - Item being sold
    /// * `quantity` - Units sold (validated positive by the caller)
    /// * `sale_price_cents` - Unit price charged
    ///
    /// ## Returns
    /// * `Ok(Sale)` - The stored sale
    /// * `Err(DbError::NotFound)` - No such item
    /// * `Err(DbError::InsufficientStock)` - Not enough units on hand
    ///
    /// On any error nothing is written.
    pub async fn record(&self, item_id: i64, quantity: i64, sale_price_cents: i64) -> DbResult<Sale> {
        debug!(item_id = item_id, quantity = quantity, "Recording sale");

        let mut tx = self.pool.begin().await?;

        let decremented = sqlx::query(
            r#"
            UPDATE inventory
            SET quantity = quantity - ?2
            WHERE id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            let available: Option<i64> =
                sqlx::query_scalar("SELECT quantity FROM inventory WHERE id = ?1")
                    .bind(item_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            tx.rollback().await?;

            return Err(match available {
                None => DbError::not_found("Item", item_id),
                Some(available) => {
                    warn!(
                        item_id = item_id,
                        available = available,
                        requested = quantity,
                        "Sale rejected: insufficient stock"
                    );
                    DbError::InsufficientStock {
                        item_id,
                        available,
                        requested: quantity,
                    }
                }
            });
        }

        let sale_date = Utc::now().trunc_subsecs(0);

        let inserted = sqlx::query(
            r#"
            INSERT INTO sales (item_id, quantity, sale_price_cents, sale_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .bind(sale_price_cents)
        .bind(format_timestamp(sale_date))
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        let sale = Sale {
            id: inserted.last_insert_rowid(),
            item_id,
            quantity,
            sale_price_cents,
            sale_date,
        };

        debug!(sale_id = sale.id, item_id = item_id, "Sale recorded");
        Ok(sale)
    }

    /// Lists every sale joined with its item name, in sale id order.
    pub async fn list_history(&self) -> DbResult<Vec<SaleHistoryRow>> {
        let rows = sqlx::query_as::<_, SaleHistoryRow>(
            r#"
            SELECT
                s.id AS sale_id,
                s.item_id AS item_id,
                i.item AS item_name,
                s.quantity AS quantity,
                s.sale_price_cents AS sale_price_cents,
                s.sale_date AS sale_date
            FROM sales s
            JOIN inventory i ON i.id = s.item_id
            ORDER BY s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed sales history");
        Ok(rows)
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

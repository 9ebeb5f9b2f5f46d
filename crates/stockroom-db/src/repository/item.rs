//! # Item Repository
//!
//! Database operations for inventory items.
//!
//! ## Key Operations
//! - CRUD over the `inventory` table
//! - Guarded delete: items with recorded sales stay
//!
//! ## Delete Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    delete(id)                                           │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    item exists?          ── no ──► NotFound        (rollback)          │
//! │    sales reference it?   ── yes ─► ItemHasSales    (rollback)          │
//! │    DELETE FROM inventory                                               │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The sales.item_id foreign key backs this up inside SQLite.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{InventoryItem, NewItem};

/// Columns selected for every `InventoryItem` read.
const ITEM_COLUMNS: &str = "id, item, category, quantity, price_cents, min_stock";

/// Repository for inventory item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.items();
///
/// let rice = repo.insert(&NewItem::new("Rice", Category::Groceries, 10, price)).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists every item in id order.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM inventory ORDER BY id");
        let items = sqlx::query_as::<_, InventoryItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    /// Gets an item by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<InventoryItem>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM inventory WHERE id = ?1");
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Inserts a new item and returns it with its assigned id.
    ///
    /// Input is expected to be validated already.
    pub async fn insert(&self, item: &NewItem) -> DbResult<InventoryItem> {
        debug!(item = %item.item, category = ?item.category, "Inserting item");

        let result = sqlx::query(
            r#"
            INSERT INTO inventory (item, category, quantity, price_cents, min_stock)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&item.item)
        .bind(item.category)
        .bind(item.quantity)
        .bind(item.price.cents())
        .bind(item.min_stock)
        .execute(&self.pool)
        .await?;

        Ok(InventoryItem {
            id: result.last_insert_rowid(),
            item: item.item.clone(),
            category: item.category,
            quantity: item.quantity,
            price_cents: item.price.cents(),
            min_stock: item.min_stock,
        })
    }

    /// Replaces every mutable field of an item. The id never changes.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn update(&self, id: i64, item: &NewItem) -> DbResult<()> {
        debug!(id = id, "Updating item");

        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                item = ?2,
                category = ?3,
                quantity = ?4,
                price_cents = ?5,
                min_stock = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&item.item)
        .bind(item.category)
        .bind(item.quantity)
        .bind(item.price.cents())
        .bind(item.min_stock)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Deletes an item that has no recorded sales.
    ///
    /// ## Returns
    /// * `Ok(())` - Item removed
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    /// * `Err(DbError::ItemHasSales)` - Sales reference the item; nothing removed
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting item");

        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM inventory WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DbError::not_found("Item", id));
        }

        let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE item_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if sales > 0 {
            return Err(DbError::ItemHasSales { id, sales });
        }

        sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::ForeignKey(_) => DbError::ItemHasSales { id, sales: 1 },
                other => other,
            })?;

        tx.commit().await?;
        Ok(())
    }

    /// Counts items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use stockroom_core::{Category, Money};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn rice() -> NewItem {
        NewItem::new("Rice", Category::Groceries, 10, Money::from_cents(50_000))
    }

    #[tokio::test]
    async fn test_insert_assigns_fresh_ids() {
        let db = setup().await;

        let first = db.items().insert(&rice()).await.unwrap();
        let second = db.items().insert(&rice().with_min_stock(2)).await.unwrap();
        assert!(second.id > first.id);

        let items = db.items().list().await.unwrap();
        assert_eq!(items, vec![first.clone(), second]);
        assert_eq!(items[0].item, "Rice");
        assert_eq!(items[0].category, Category::Groceries);
        assert_eq!(items[0].quantity, 10);
        assert_eq!(items[0].price_cents, 50_000);
        assert_eq!(items[0].min_stock, 5);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = setup().await;
        let inserted = db.items().insert(&rice()).await.unwrap();

        let found = db.items().get_by_id(inserted.id).await.unwrap();
        assert_eq!(found, Some(inserted));
        assert_eq!(db.items().get_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_id() {
        let db = setup().await;
        let inserted = db.items().insert(&rice()).await.unwrap();

        let changed = NewItem::new("Ofada Rice", Category::Other, 3, Money::from_cents(72_050))
            .with_min_stock(4);
        db.items().update(inserted.id, &changed).await.unwrap();

        let items = db.items().list().await.unwrap();
        assert_eq!(items.len(), 1);
        let stored = &items[0];
        assert_eq!(stored.id, inserted.id);
        assert_eq!(stored.item, "Ofada Rice");
        assert_eq!(stored.category, Category::Other);
        assert_eq!(stored.quantity, 3);
        assert_eq!(stored.price_cents, 72_050);
        assert_eq!(stored.min_stock, 4);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = setup().await;
        let err = db.items().update(42, &rice()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_leaves_table_unchanged() {
        let db = setup().await;
        db.items().insert(&rice()).await.unwrap();

        let err = db.items().delete(999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(db.items().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_item_and_never_reuses_id() {
        let db = setup().await;
        let first = db.items().insert(&rice()).await.unwrap();
        db.items().delete(first.id).await.unwrap();
        assert_eq!(db.items().count().await.unwrap(), 0);

        let next = db.items().insert(&rice()).await.unwrap();
        assert!(next.id > first.id);
    }

    #[tokio::test]
    async fn test_delete_refused_when_item_has_sales() {
        let db = setup().await;
        let item = db.items().insert(&rice()).await.unwrap();
        db.sales().record(item.id, 1, 50_000).await.unwrap();

        let err = db.items().delete(item.id).await.unwrap_err();
        assert!(matches!(err, DbError::ItemHasSales { sales: 1, .. }));
        assert!(db.items().get_by_id(item.id).await.unwrap().is_some());
    }
}

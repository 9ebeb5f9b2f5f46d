//! # Sale Commands
//!
//! Recording sales and reading the sales history.
//!
//! ## Recording Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sell <item_id> <quantity> [unit price]                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate quantity > 0, price >= 0                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleRepository::record  (one transaction)                             │
//! │       ├── stock decremented only if enough units remain                │
//! │       └── sale row appended with the current UTC time                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Sale  |  NOT_FOUND  |  INSUFFICIENT_STOCK                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::Session;
use stockroom_core::validation::{validate_price, validate_sale_quantity};
use stockroom_core::{Money, Sale, SaleHistoryRow};
use stockroom_db::Database;

/// Records a sale at the given unit price.
///
/// ## Returns
/// * `Ok(Sale)` - Stock decremented and sale stored
/// * `Err(VALIDATION_ERROR)` - Quantity below 1 or negative price
/// * `Err(NOT_FOUND)` - No such item
/// * `Err(INSUFFICIENT_STOCK)` - Fewer units on hand than requested
pub async fn record_sale(
    db: &Database,
    session: &Session,
    item_id: i64,
    quantity: i64,
    sale_price: Money,
) -> Result<Sale, ApiError> {
    let start = Instant::now();

    validate_sale_quantity(quantity)?;
    validate_price("sale price", sale_price)?;

    let sale = db
        .sales()
        .record(item_id, quantity, sale_price.cents())
        .await?;

    info!(
        user = %session.username,
        sale_id = sale.id,
        item_id = item_id,
        quantity = quantity,
        line_total = %sale.line_total(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Sale recorded"
    );
    Ok(sale)
}

/// Sales joined with item names, oldest first.
pub async fn list_sales(db: &Database, session: &Session) -> Result<Vec<SaleHistoryRow>, ApiError> {
    debug!(user = %session.username, "list_sales command");
    Ok(db.sales().list_history().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::inventory;
    use crate::error::ErrorCode;
    use stockroom_core::{Category, NewItem};
    use stockroom_db::DbConfig;

    async fn setup() -> (Database, Session, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = Session::new("admin");
        let item = inventory::add_item(
            &db,
            &session,
            NewItem::new("Rice", Category::Groceries, 10, Money::from_cents(50_000)),
        )
        .await
        .unwrap();
        (db, session, item.id)
    }

    #[tokio::test]
    async fn test_sale_decrements_stock_and_appears_in_history() {
        let (db, session, id) = setup().await;

        let sale = record_sale(&db, &session, id, 3, Money::from_cents(48_000))
            .await
            .unwrap();
        assert_eq!(sale.line_total(), Money::from_cents(144_000));

        let item = inventory::get_item(&db, &session, id).await.unwrap();
        assert_eq!(item.quantity, 7);

        let history = list_sales(&db, &session).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].item_id, id);
        assert_eq!(history[0].item_name, "Rice");
        assert_eq!(history[0].sale_price(), Money::from_cents(48_000));
    }

    #[tokio::test]
    async fn test_invalid_quantity_or_price_is_rejected() {
        let (db, session, id) = setup().await;

        let err = record_sale(&db, &session, id, 0, Money::from_cents(100))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = record_sale(&db, &session, id, 1, Money::from_cents(-100))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(list_sales(&db, &session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversell_is_insufficient_stock() {
        let (db, session, id) = setup().await;

        let err = record_sale(&db, &session, id, 11, Money::from_cents(50_000))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let item = inventory::get_item(&db, &session, id).await.unwrap();
        assert_eq!(item.quantity, 10);
        assert!(list_sales(&db, &session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sale_of_unknown_item_is_not_found() {
        let (db, session, _) = setup().await;
        let err = record_sale(&db, &session, 404, 1, Money::zero())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}

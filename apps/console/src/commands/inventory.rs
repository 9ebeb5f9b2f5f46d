//! # Inventory Commands
//!
//! CRUD over stock lines plus the low-stock view.
//!
//! Every write validates its `NewItem` first, so the repository only ever
//! sees a non-empty name, non-negative quantity and price, and a positive
//! threshold.

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::Session;
use stockroom_core::analytics;
use stockroom_core::validation::validate_new_item;
use stockroom_core::{InventoryItem, NewItem};
use stockroom_db::Database;

/// Lists every item in id order.
pub async fn list_items(db: &Database, session: &Session) -> Result<Vec<InventoryItem>, ApiError> {
    debug!(user = %session.username, "list_items command");
    Ok(db.items().list().await?)
}

/// Gets one item, or `NOT_FOUND`.
pub async fn get_item(db: &Database, session: &Session, id: i64) -> Result<InventoryItem, ApiError> {
    debug!(user = %session.username, id = id, "get_item command");
    db.items()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item", &id.to_string()))
}

/// Adds a stock line and returns it with its assigned id.
///
/// ## Arguments
/// * `item` - Name, category, quantity, unit price, threshold (default 5)
///
/// ## Returns
/// * `Ok(InventoryItem)` - The stored item
/// * `Err(VALIDATION_ERROR)` - Empty name, negative quantity or price, or
///   a threshold below 1
pub async fn add_item(
    db: &Database,
    session: &Session,
    item: NewItem,
) -> Result<InventoryItem, ApiError> {
    let item = NewItem {
        item: item.item.trim().to_string(),
        ..item
    };
    validate_new_item(&item)?;

    let stored = db.items().insert(&item).await?;
    info!(
        user = %session.username,
        id = stored.id,
        item = %stored.item,
        quantity = stored.quantity,
        "Item added"
    );
    Ok(stored)
}

/// Replaces every mutable field of an item and returns the stored result.
pub async fn update_item(
    db: &Database,
    session: &Session,
    id: i64,
    item: NewItem,
) -> Result<InventoryItem, ApiError> {
    let item = NewItem {
        item: item.item.trim().to_string(),
        ..item
    };
    validate_new_item(&item)?;

    db.items().update(id, &item).await?;
    info!(user = %session.username, id = id, "Item updated");

    Ok(InventoryItem {
        id,
        item: item.item,
        category: item.category,
        quantity: item.quantity,
        price_cents: item.price.cents(),
        min_stock: item.min_stock,
    })
}

/// Deletes an item that has never been sold.
///
/// ## Returns
/// * `Ok(())` - Item removed
/// * `Err(NOT_FOUND)` - No such item
/// * `Err(ITEM_HAS_SALES)` - Sales reference the item; nothing removed
pub async fn delete_item(db: &Database, session: &Session, id: i64) -> Result<(), ApiError> {
    db.items().delete(id).await?;
    info!(user = %session.username, id = id, "Item deleted");
    Ok(())
}

/// Items whose quantity is below their threshold, in id order.
pub async fn low_stock_items(
    db: &Database,
    session: &Session,
) -> Result<Vec<InventoryItem>, ApiError> {
    let items = list_items(db, session).await?;
    Ok(analytics::low_stock_items(&items))
}

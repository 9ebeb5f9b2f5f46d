//! # Report Commands
//!
//! Dashboard analytics and inventory export.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  analytics                                                             │
//! │     list_items() + list_sales()  ──►  AnalyticsReport                   │
//! │                                       ├── summary                      │
//! │                                       ├── stock / value by category    │
//! │                                       ├── price distribution           │
//! │                                       └── daily revenue                │
//! │                                                                         │
//! │  export <path> [--format text|csv]                                     │
//! │     list_items() ──► snapshot ──► render ──► tokio::fs::write           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::commands::{inventory, sale};
use crate::error::ApiError;
use crate::state::Session;
use stockroom_core::analytics::{self, InventorySummary};
use stockroom_core::{export, Category, Money};
use stockroom_db::Database;

/// Everything the analytics view shows, computed from one read of each table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    pub summary: InventorySummary,
    pub stock_by_category: BTreeMap<Category, i64>,
    pub value_by_category: BTreeMap<Category, Money>,
    pub price_distribution: BTreeMap<Money, usize>,
    pub daily_revenue: BTreeMap<NaiveDate, Money>,
}

/// Builds the analytics report.
pub async fn analytics(db: &Database, session: &Session) -> Result<AnalyticsReport, ApiError> {
    let items = inventory::list_items(db, session).await?;
    let sales = sale::list_sales(db, session).await?;

    debug!(items = items.len(), sales = sales.len(), "Building analytics");

    Ok(AnalyticsReport {
        summary: analytics::summarize(&items),
        stock_by_category: analytics::stock_by_category(&items),
        value_by_category: analytics::value_by_category(&items),
        price_distribution: analytics::price_distribution(&items),
        daily_revenue: analytics::daily_revenue(&sales),
    })
}

/// File format for `export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// Aligned plain-text table
    #[default]
    Text,
    /// Comma-separated values with a header row
    Csv,
}

impl ExportFormat {
    /// Picks a format from a file extension, if it names one.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "txt" => Some(ExportFormat::Text),
            _ => None,
        }
    }
}

/// Writes the current inventory to `path` and returns the number of rows.
///
/// An existing file is overwritten.
pub async fn export_inventory(
    db: &Database,
    session: &Session,
    format: ExportFormat,
    path: &Path,
) -> Result<usize, ApiError> {
    let items = inventory::list_items(db, session).await?;
    let rows = export::snapshot(&items);

    let rendered = match format {
        ExportFormat::Text => export::to_text(&rows),
        ExportFormat::Csv => export::to_csv(&rows)?,
    };

    tokio::fs::write(path, rendered).await.map_err(|e| {
        ApiError::internal(format!("Could not write {}: {}", path.display(), e))
    })?;

    info!(
        user = %session.username,
        path = %path.display(),
        format = ?format,
        rows = rows.len(),
        "Inventory exported"
    );
    Ok(rows.len())
}

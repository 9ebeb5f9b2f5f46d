//! # Inventory Export
//!
//! Renders an inventory snapshot as a plain-text table or CSV.
//!
//! ```text
//! list_items() ──► snapshot() ──► Vec<SnapshotRow> ──┬──► to_text()  aligned table
//!                                                    └──► to_csv()   header + rows
//! ```
//!
//! Rendering happens in memory; writing the bytes to disk is the caller's job.

use serde::{Serialize, Serializer};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::InventoryItem;

/// Column headers, shared by both renderers.
const HEADERS: [&str; 7] = [
    "id",
    "item",
    "category",
    "quantity",
    "price",
    "min_stock",
    "total_value",
];

/// One exported inventory line with its computed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRow {
    pub id: i64,
    pub item: String,
    pub category: String,
    pub quantity: i64,
    #[serde(serialize_with = "as_decimal")]
    pub price: Money,
    pub min_stock: i64,
    #[serde(serialize_with = "as_decimal")]
    pub total_value: Money,
}

impl SnapshotRow {
    fn cells(&self) -> [String; 7] {
        [
            self.id.to_string(),
            self.item.clone(),
            self.category.clone(),
            self.quantity.to_string(),
            self.price.to_string(),
            self.min_stock.to_string(),
            self.total_value.to_string(),
        ]
    }
}

fn as_decimal<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(money)
}

/// Builds the export rows, computing `total_value = quantity × price`.
pub fn snapshot(items: &[InventoryItem]) -> Vec<SnapshotRow> {
    items
        .iter()
        .map(|item| SnapshotRow {
            id: item.id,
            item: item.item.clone(),
            category: item.category.key().to_string(),
            quantity: item.quantity,
            price: item.price(),
            min_stock: item.min_stock,
            total_value: item.total_value(),
        })
        .collect()
}

/// Renders rows as a whitespace-aligned table with a header line.
///
/// Numeric columns are right-aligned, text columns left-aligned.
pub fn to_text(rows: &[SnapshotRow]) -> String {
    let cells: Vec<[String; 7]> = rows.iter().map(SnapshotRow::cells).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |line: &[String]| -> String {
        line.iter()
            .enumerate()
            .map(|(col, cell)| {
                let width = widths[col];
                if col == 1 || col == 2 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let mut out = render(&header);
    out.push('\n');
    for row in &cells {
        out.push_str(&render(row));
        out.push('\n');
    }
    out
}

/// Renders rows as CSV with a header row, amounts as `major.minor`.
pub fn to_csv(rows: &[SnapshotRow]) -> CoreResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    if rows.is_empty() {
        writer
            .write_record(HEADERS)
            .map_err(|e| CoreError::Export(e.to_string()))?;
    }
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| CoreError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CoreError::Export(e.to_string()))
}

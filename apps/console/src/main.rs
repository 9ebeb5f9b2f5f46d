//! # Stockroom Console Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Console                                │
//! │                                                                         │
//! │  main.rs ────► parses arguments, sets up logging                       │
//! │  lib.rs ─────► config, database, admin bootstrap, shell                │
//! │  commands/ ──► add_item, record_sale, analytics, export_inventory      │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  stockroom.db (local file, WAL mode)                             │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use stockroom_console::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    stockroom_console::init_tracing();
    stockroom_console::run(cli).await
}

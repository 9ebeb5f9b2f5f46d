//! # Stockroom Console Library
//!
//! Startup wiring and the interactive shell for the Stockroom inventory
//! dashboard.
//!
//! ```text
//! stockroom_console/
//! ├── lib.rs          ◄─── Cli, run, init_tracing
//! ├── state/
//! │   ├── config.rs   ◄─── TOML + env configuration
//! │   └── session.rs  ◄─── Signed-in operator
//! ├── commands/
//! │   ├── auth.rs     ◄─── Sign-up, login, admin bootstrap
//! │   ├── inventory.rs◄─── Item CRUD, low stock
//! │   ├── sale.rs     ◄─── Sales and history
//! │   └── report.rs   ◄─── Analytics, export
//! ├── shell.rs        ◄─── Line parsing and rendering
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod shell;
pub mod state;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shell::Shell;
use state::ConfigState;
use stockroom_db::{Database, DbConfig};

/// Command-line arguments for the `stockroom` binary.
#[derive(Debug, Parser)]
#[command(name = "stockroom", version, about = "Single-user inventory dashboard")]
pub struct Cli {
    /// Config file (default: platform config dir, stockroom.toml)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite database file, overriding config and environment
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,
}

/// Runs the console application.
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults, stockroom.toml, STOCKROOM_* env, then --db              │
/// │                                                                         │
/// │  2. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  3. Bootstrap Administrator ──────────────────────────────────────────► │
/// │     • Created once, AlreadyPresent afterwards                           │
/// │                                                                         │
/// │  4. Run Shell on stdin/stdout ────────────────────────────────────────► │
/// │                                                                         │
/// │  5. Close Pool ───────────────────────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ConfigState::load(cli.config).context("Failed to load configuration")?;
    if let Some(path) = cli.db {
        config.database.path = Some(path);
    }

    let db_path = config.database_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    info!(?db_path, store = %config.store.name, "Starting Stockroom");

    let db = Database::new(
        DbConfig::new(&db_path).max_connections(config.database.max_connections),
    )
    .await
    .context("Failed to open database")?;
    info!("Database connected and migrations applied");

    commands::auth::bootstrap_admin(&db, &config).await?;

    let mut shell = Shell::new(db.clone(), config);
    let result = shell
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await;

    db.close().await;
    info!("Stockroom stopped");
    result
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with shell output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom=trace` - Show trace for stockroom crates only
/// - Default: `info,stockroom=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

//! # Database Migrations
//!
//! The schema ships inside the binary: `sqlx::migrate!` embeds every file in
//! `migrations/sqlite/` at compile time, and sqlx records what it applied in
//! `_sqlx_migrations`.
//!
//! ```text
//! migrations/sqlite/
//! └── 001_initial_schema.sql    users • inventory • sales
//! ```
//!
//! Applied files must never be edited; sqlx checksums them. Schema changes
//! go in a new `NNN_description.sql`.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far a database is behind the embedded schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migrations embedded in this build.
    pub total: usize,
    /// Migrations recorded as applied.
    pub applied: usize,
}

impl MigrationStatus {
    pub fn pending(&self) -> usize {
        self.total.saturating_sub(self.applied)
    }
}

/// Applies pending migrations in filename order, each in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let before = migration_status(pool).await?;
    if before.pending() == 0 {
        debug!(applied = before.applied, "Schema is current");
        return Ok(());
    }

    MIGRATOR.run(pool).await?;
    info!(applied = before.pending(), total = before.total, "Migrations applied");
    Ok(())
}

/// Reads the migration bookkeeping table. A database that was never
/// migrated has no such table and reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let has_table: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations')",
    )
    .fetch_one(pool)
    .await?;

    let applied: i64 = if has_table {
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?
    } else {
        0
    };

    Ok(MigrationStatus {
        total: MIGRATOR.migrations.len(),
        applied: usize::try_from(applied).unwrap_or_default(),
    })
}

//! # Database Pool Management
//!
//! Opening the Stockroom database and handing out repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new("stockroom.db")          DbConfig::in_memory()          │
//! │        │  DbLocation::File                    │  DbLocation::Memory     │
//! │        ▼                                      ▼                         │
//! │  WAL journal, synchronous=NORMAL        default journal                │
//! │  foreign_keys=ON, create file           foreign_keys=ON                │
//! │  up to max_connections                  exactly one connection,        │
//! │                                         never recycled                 │
//! │        └──────────────┬───────────────────────┘                        │
//! │                       ▼                                                 │
//! │              Database::new  ──► migrate  ──► Database { pool }         │
//! │                                                   │                     │
//! │                         users() / items() / sales()                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An in-memory SQLite database lives exactly as long as its connection,
//! so that pool is pinned to a single connection with no idle or lifetime
//! expiry.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationStatus};
use crate::repository::item::ItemRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// A SQLite file, created on first connect.
    File(PathBuf),
    /// A private database that disappears with the pool.
    Memory,
}

impl fmt::Display for DbLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbLocation::File(path) => write!(f, "{}", path.display()),
            DbLocation::Memory => f.write_str(":memory:"),
        }
    }
}

/// Pool settings.
///
/// ## Example
/// ```rust
/// use stockroom_db::DbConfig;
///
/// let config = DbConfig::new("/var/lib/stockroom/stockroom.db").max_connections(2);
/// assert_eq!(config.max_connections, 2);
/// assert!(!config.is_in_memory());
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Default 5. One operator rarely needs more.
    pub max_connections: u32,

    /// How long to wait for a free connection. Default 30s.
    pub acquire_timeout: Duration,

    /// Idle file connections are closed after this. Default 10 minutes.
    pub idle_timeout: Duration,

    /// Apply embedded migrations in `Database::new`. Default true.
    pub migrate: bool,
}

impl DbConfig {
    /// File-backed configuration.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            migrate: true,
        }
    }

    /// Private in-memory database, migrated on connect. Used by tests.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(PathBuf::new())
        }
    }

    /// Sets the pool size. Ignored for in-memory databases.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Skips migrations in `Database::new`.
    pub fn without_migrations(mut self) -> Self {
        self.migrate = false;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.location == DbLocation::Memory
    }

    /// The database file, if there is one.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            DbLocation::File(path) => Some(path),
            DbLocation::Memory => None,
        }
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new().acquire_timeout(self.acquire_timeout);

        match self.location {
            DbLocation::Memory => options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            DbLocation::File(_) => options
                .max_connections(self.max_connections)
                .idle_timeout(Some(self.idle_timeout)),
        }
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = SqliteConnectOptions::new().foreign_keys(true);

        match &self.location {
            // `new()` already points at a private ":memory:" database
            DbLocation::Memory => options,
            DbLocation::File(path) => options
                .filename(path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the Stockroom database. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, applies pending migrations.
    ///
    /// ## Returns
    /// * `Err(DbError::Connection)` - File can't be opened or created
    /// * `Err(DbError::Migration)` - Schema could not be applied
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = %config.location, "Opening database");

        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::Connection(format!("{}: {}", config.location, e)))?;

        debug!(
            in_memory = config.is_in_memory(),
            max_connections = config.max_connections,
            "Pool ready"
        );

        let db = Database { pool };
        if config.migrate {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations. A no-op when the schema is current.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub async fn migration_status(&self) -> DbResult<MigrationStatus> {
        migrations::migration_status(&self.pool).await
    }

    /// Raw pool access for ad-hoc queries in tests and tools.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Waits for checked-out connections and closes the pool.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    /// True if a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_healthy_until_closed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        db.close().await;
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let first = Database::new(DbConfig::in_memory()).await.unwrap();
        let second = Database::new(DbConfig::in_memory()).await.unwrap();

        first.users().create("owner", "$argon2id$x").await.unwrap();
        assert_eq!(first.users().count().await.unwrap(), 1);
        assert_eq!(second.users().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_migrations_applied_on_connect() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let status = db.migration_status().await.unwrap();
        assert!(status.total >= 1);
        assert_eq!(status.pending(), 0);

        db.run_migrations().await.unwrap();
        assert_eq!(db.migration_status().await.unwrap(), status);
    }

    #[tokio::test]
    async fn test_file_database_persists_between_pools() {
        let path = std::env::temp_dir().join(format!(
            "stockroom-pool-test-{}.db",
            std::process::id()
        ));
        let cleanup = |path: &Path| {
            for suffix in ["", "-wal", "-shm"] {
                let mut file = path.as_os_str().to_owned();
                file.push(suffix);
                let _ = std::fs::remove_file(file);
            }
        };
        cleanup(&path);

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.users().create("owner", "$argon2id$digest").await.unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        let found = reopened.users().find_by_username("owner").await.unwrap();
        assert_eq!(found.map(|u| u.username).as_deref(), Some("owner"));
        reopened.close().await;

        cleanup(&path);
    }

    #[tokio::test]
    async fn test_unopenable_file_is_connection_error() {
        let path = std::env::temp_dir()
            .join("stockroom-missing-dir")
            .join("nested")
            .join("stockroom.db");
        let config = DbConfig::new(path).acquire_timeout(Duration::from_secs(2));
        let err = Database::new(config).await.unwrap_err();
        assert!(matches!(err, DbError::Connection(_)));
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .without_migrations();

        assert_eq!(config.max_connections, 10);
        assert!(!config.migrate);
        assert_eq!(config.path(), Some(Path::new("/tmp/test.db")));
        assert_eq!(config.location.to_string(), "/tmp/test.db");

        let memory = DbConfig::in_memory();
        assert!(memory.is_in_memory());
        assert!(memory.migrate);
        assert_eq!(memory.path(), None);
    }
}

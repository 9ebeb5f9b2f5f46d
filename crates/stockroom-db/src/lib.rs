//! # stockroom-db
//!
//! SQLite storage for Stockroom, on sqlx.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database (pool.rs)                                                    │
//! │    ├── users()  ──► UserRepository   create, find, ensure (seed)       │
//! │    ├── items()  ──► ItemRepository   list, get, insert, update, delete │
//! │    └── sales()  ──► SaleRepository   record (transactional), history   │
//! │                                                                         │
//! │  migrations.rs   embedded 001_initial_schema.sql                        │
//! │  error.rs        DbError, classified from SQLite constraint messages    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories take and return `stockroom-core` types. Input validation
//! happens before a call reaches this crate; the schema's CHECK constraints
//! are the last line.
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stockroom.db")).await?;
//! let rice = db.items().get_by_id(1).await?;
//! let sale = db.sales().record(1, 3, 48_000).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig, DbLocation};
pub use repository::item::ItemRepository;
pub use repository::sale::SaleRepository;
pub use repository::user::{SeedOutcome, UserRepository};

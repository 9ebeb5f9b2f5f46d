//! # State Module
//!
//! Application state for the console shell.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────────┐      │
//! │  │   Database   │  │   ConfigState    │  │    SessionState      │      │
//! │  │              │  │                  │  │                      │      │
//! │  │  SQLite pool │  │  store, database │  │  Option<Session>     │      │
//! │  │  (shared)    │  │  admin sections  │  │  (signed-in user)    │      │
//! │  └──────────────┘  └──────────────────┘  └──────────────────────┘      │
//! │                                                                         │
//! │  • Database: internal connection pool, cheap to clone                  │
//! │  • ConfigState: read-only after startup                                │
//! │  • SessionState: owned by the shell, changed by login/logout           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{AdminConfig, ConfigState, DatabaseConfig, StoreConfig, DEFAULT_ADMIN_PASSWORD};
pub use session::{Session, SessionState};

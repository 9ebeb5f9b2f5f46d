//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (--db)                      (highest priority)        │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     STOCKROOM_DB_PATH, STOCKROOM_STORE_NAME,                           │
//! │     STOCKROOM_CURRENCY_SYMBOL, STOCKROOM_ADMIN_USERNAME,               │
//! │     STOCKROOM_ADMIN_PASSWORD                                           │
//! │                                                                         │
//! │  3. TOML Config File (--config, or the platform config dir)            │
//! │     ~/.config/stockroom/stockroom.toml (Linux)                         │
//! │     ~/Library/Application Support/com.stockroom.stockroom/... (macOS)  │
//! │                                                                         │
//! │  4. Default Values                           (lowest priority)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Mama Put Provisions"
//! currency_symbol = "₦"
//!
//! [database]
//! path = "/var/lib/stockroom/stockroom.db"
//! max_connections = 5
//!
//! [admin]
//! username = "admin"
//! password = "change-me-please"
//! ```
//!
//! Configuration is read-only after startup.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stockroom_core::Money;
use tracing::{debug, info};

use crate::error::ConfigError;

/// Administrator password used when nothing else is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const CONFIG_FILE_NAME: &str = "stockroom.toml";
const DATABASE_FILE_NAME: &str = "stockroom.db";

// =============================================================================
// Sections
// =============================================================================

/// Store presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store name shown in the shell banner.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Currency symbol for display.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Stockroom".to_string()
}

fn default_currency_symbol() -> String {
    "₦".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Database location and pool size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file. `None` means the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Bootstrap administrator credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_username")]
    pub username: String,

    #[serde(default = "default_admin_password")]
    pub password: String,
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

impl AdminConfig {
    /// True when the well-known default password is in effect.
    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_ADMIN_PASSWORD
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        AdminConfig {
            username: default_admin_username(),
            password: default_admin_password(),
        }
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Config State
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigState {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

impl ConfigState {
    /// Loads configuration: defaults, then the TOML file, then environment.
    ///
    /// An explicit `config_path` that doesn't exist is an error; a missing
    /// file at the default location is not.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let explicit = config_path.is_some();
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() || explicit => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.username.trim().is_empty() {
            return Err(ConfigError::Invalid("admin username must not be empty".into()));
        }

        if self.admin.password.is_empty() {
            return Err(ConfigError::Invalid("admin password must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `STOCKROOM_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("STOCKROOM_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("STOCKROOM_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(symbol) = lookup("STOCKROOM_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        if let Some(username) = lookup("STOCKROOM_ADMIN_USERNAME") {
            debug!(username = %username, "Overriding admin username from environment");
            self.admin.username = username;
        }

        if let Some(password) = lookup("STOCKROOM_ADMIN_PASSWORD") {
            debug!("Overriding admin password from environment");
            self.admin.password = password;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Resolves the database file path.
    ///
    /// Falls back to the platform data directory, then the working directory.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.database.path {
            return path.clone();
        }

        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }

    /// Formats money with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_console::state::ConfigState;
    /// use stockroom_core::Money;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(50050)), "₦500.50");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.store.currency_symbol,
            amount.major().abs(),
            amount.cents_part()
        )
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "stockroom", "stockroom")
}

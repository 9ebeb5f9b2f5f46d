//! # Console Error Type
//!
//! What a command returns when it can't do what was asked.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError (core)  ──────────────────────► VALIDATION_ERROR       │
//! │  CoreError::PasswordHash ──────────────────────► INTERNAL               │
//! │  DbError::NotFound       ──────────────────────► NOT_FOUND              │
//! │  DbError::Duplicate      ──────────────────────► CONFLICT               │
//! │  DbError::InsufficientStock ───────────────────► INSUFFICIENT_STOCK     │
//! │  DbError::ItemHasSales   ──────────────────────► ITEM_HAS_SALES         │
//! │  DbError::Check          ──────────────────────► VALIDATION_ERROR       │
//! │  any other DbError       ── logged in full ────► DATABASE_ERROR         │
//! │                                                                         │
//! │  The shell prints every one as   error[CODE]: message                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use stockroom_core::{CoreError, ValidationError};
use stockroom_db::DbError;
use thiserror::Error;

/// A failed command: a stable code plus a line for the operator.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Item not found: 42" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// Error codes, serialized in SCREAMING_SNAKE_CASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    /// Username already registered
    Conflict,
    InsufficientStock,
    ItemHasSales,
    /// No session, or bad credentials
    Unauthenticated,
    DatabaseError,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::ItemHasSales => "ITEM_HAS_SALES",
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// `"<resource> not found: <id>"`
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthenticated, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let code = match &err {
            DbError::NotFound { entity, id } => return ApiError::not_found(entity, id),
            DbError::Duplicate { field, value } => {
                return ApiError::new(
                    ErrorCode::Conflict,
                    format!("{field} '{value}' already exists"),
                )
            }
            DbError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            DbError::ItemHasSales { .. } => ErrorCode::ItemHasSales,
            DbError::Check(_) => ErrorCode::ValidationError,
            _ => {
                // Operators get a generic line; the log gets the details
                tracing::error!(error = %err, "Database failure");
                return ApiError::new(ErrorCode::DatabaseError, "Database operation failed");
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            CoreError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
                ApiError::internal("Could not store the password")
            }
            CoreError::Export(e) => ApiError::internal(format!("Export failed: {e}")),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while loading `stockroom.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is present but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_not_found_maps_to_not_found() {
        let err: ApiError = DbError::not_found("Item", 42).into();
        assert_eq!(err, ApiError::not_found("Item", "42"));
        assert_eq!(err.message, "Item not found: 42");
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err: ApiError = DbError::duplicate("username", "admin").into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "username 'admin' already exists");
    }

    #[test]
    fn test_stock_outcomes_keep_their_codes() {
        let err: ApiError = DbError::InsufficientStock {
            item_id: 1,
            available: 2,
            requested: 3,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("2 available"));

        let err: ApiError = DbError::ItemHasSales { id: 1, sales: 4 }.into();
        assert_eq!(err.code, ErrorCode::ItemHasSales);
    }

    #[test]
    fn test_storage_failures_are_generic() {
        let err: ApiError = DbError::Storage("near \"SELEC\": syntax error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");

        let err: ApiError = DbError::Connection("pool is closed".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn test_check_constraint_is_validation() {
        let err: ApiError = DbError::Check("quantity >= 0".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_validation_maps_to_validation_error() {
        let err: ApiError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "error[VALIDATION_ERROR]: quantity must be positive");

        let err: ApiError = CoreError::Validation(ValidationError::Required {
            field: "item".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serializes_code_and_message() {
        let json = serde_json::to_string(&ApiError::unauthenticated("Invalid username or password"))
            .unwrap();
        assert_eq!(
            json,
            r#"{"code":"UNAUTHENTICATED","message":"Invalid username or password"}"#
        );
    }
}

//! # Error Types
//!
//! Failures that can happen without touching storage.
//!
//! ```text
//! ValidationError ──(#[from])──► CoreError
//!        │                           │
//!        └──────────┬────────────────┘
//!                   ▼
//!     console ApiError (VALIDATION_ERROR / INTERNAL)
//! ```
//!
//! Storage failures live in `stockroom-db` as `DbError`.

use thiserror::Error;

/// Errors from hashing, export rendering, or validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Argon2 could not produce a digest.
    ///
    /// ## When This Occurs
    /// - Practically never: parameter or salt errors inside the KDF
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// The CSV writer failed while rendering a snapshot.
    #[error("Export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Operator input that is rejected before any statement is issued.
///
/// Every variant names the offending field so the message can be shown as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Empty, or only whitespace.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Zero or below where at least one is needed (sale quantity, threshold).
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Above the accepted ceiling for a quantity or price.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: String },

    /// Below zero where zero is fine (stock quantity, price).
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Text that doesn't parse, such as `12.345` as an amount.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Not one of a closed set, such as an unknown category.
    #[error("{field} must be one of: {}", allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A confirmation field differs from the value it confirms.
    #[error("{field} does not match")]
    Mismatch { field: String },
}

/// Result alias for fallible core operations.
pub type CoreResult<T> = Result<T, CoreError>;

//! # Auth Commands
//!
//! Account creation, credential checks and the administrator bootstrap.
//!
//! ## Sign-in Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login alice hunter22                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  users.find_by_username("alice")                                       │
//! │       │                                                                 │
//! │       ├── None ───────────────────────────► false                      │
//! │       ▼                                                                 │
//! │  verify_password(plaintext, stored Argon2id digest)                    │
//! │       │                                                                 │
//! │       ├── mismatch ───────────────────────► false                      │
//! │       ▼                                                                 │
//! │  true  ──► sign_in wraps it in a Session                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown user and wrong password are indistinguishable to the caller.

use tracing::{debug, info, warn};

use crate::error::{ApiError, ErrorCode};
use crate::state::{ConfigState, Session};
use stockroom_core::password::{hash_password, verify_password};
use stockroom_core::validation::{validate_new_password, validate_username};
use stockroom_core::User;
use stockroom_db::{Database, SeedOutcome};

/// Registers a new user.
///
/// ## Returns
/// * `Ok(User)` - The stored account (digest only)
/// * `Err(VALIDATION_ERROR)` - Bad username, short or mismatched password
/// * `Err(CONFLICT)` - Username taken; nothing is written
pub async fn create_user(
    db: &Database,
    username: &str,
    password: &str,
    confirmation: &str,
) -> Result<User, ApiError> {
    let username = username.trim();
    debug!(username = %username, "create_user command");

    validate_username(username)?;
    validate_new_password(password, confirmation)?;

    if db.users().find_by_username(username).await?.is_some() {
        return Err(ApiError::new(
            ErrorCode::Conflict,
            format!("username '{}' already exists", username),
        ));
    }

    let digest = hash_password(password)?;
    let user = db.users().create(username, &digest).await?;

    info!(username = %user.username, "User created");
    Ok(user)
}

/// Checks a username and password against the stored digest.
///
/// Read-only. Returns `Ok(false)` for an unknown user.
pub async fn login(db: &Database, username: &str, password: &str) -> Result<bool, ApiError> {
    let Some(user) = db.users().find_by_username(username.trim()).await? else {
        debug!(username = %username, "Login for unknown user");
        return Ok(false);
    };

    Ok(verify_password(password, &user.password_hash))
}

/// Verifies credentials and opens a session on success.
pub async fn sign_in(
    db: &Database,
    username: &str,
    password: &str,
) -> Result<Option<Session>, ApiError> {
    if !login(db, username, password).await? {
        warn!(username = %username, "Sign-in rejected");
        return Ok(None);
    }

    let session = Session::new(username.trim());
    info!(username = %session.username, session_id = %session.id, "Signed in");
    Ok(Some(session))
}

/// Ensures the configured administrator account exists.
///
/// Idempotent: a second run reports `AlreadyPresent` and leaves the stored
/// digest untouched, even if the configured password has changed since.
pub async fn bootstrap_admin(db: &Database, config: &ConfigState) -> Result<SeedOutcome, ApiError> {
    let admin = &config.admin;

    if admin.uses_default_password() {
        warn!(
            username = %admin.username,
            "Administrator uses the default password; set STOCKROOM_ADMIN_PASSWORD or [admin] password"
        );
    }

    let digest = hash_password(&admin.password)?;
    let outcome = db.users().ensure_user(&admin.username, &digest).await?;

    match outcome {
        SeedOutcome::Created => info!(username = %admin.username, "Administrator account created"),
        SeedOutcome::AlreadyPresent => {
            debug!(username = %admin.username, "Administrator account already present")
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_db::DbConfig;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_created_user_can_log_in() {
        let db = setup().await;
        let user = create_user(&db, "alice", "hunter222", "hunter222").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "hunter222");

        assert!(login(&db, "alice", "hunter222").await.unwrap());
        assert!(!login(&db, "alice", "hunter223").await.unwrap());
        assert!(!login(&db, "bob", "hunter222").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let db = setup().await;
        create_user(&db, "alice", "first-pass", "first-pass").await.unwrap();

        let err = create_user(&db, "alice", "second-pass", "second-pass")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        // The first password still works
        assert!(login(&db, "alice", "first-pass").await.unwrap());
        assert!(!login(&db, "alice", "second-pass").await.unwrap());
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_user_validates_before_writing() {
        let db = setup().await;

        let err = create_user(&db, "carol", "short", "short").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_user(&db, "carol", "long-enough", "different!")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_user(&db, "a b", "long-enough", "long-enough")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(db.users().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sign_in_returns_session() {
        let db = setup().await;
        create_user(&db, "alice", "hunter222", "hunter222").await.unwrap();

        let session = sign_in(&db, "alice", "hunter222").await.unwrap().unwrap();
        assert_eq!(session.username, "alice");
        assert!(sign_in(&db, "alice", "nope-nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_admin_is_idempotent() {
        let db = setup().await;
        let mut config = ConfigState::default();

        let first = bootstrap_admin(&db, &config).await.unwrap();
        assert_eq!(first, SeedOutcome::Created);
        assert!(login(&db, "admin", "admin123").await.unwrap());

        config.admin.password = "rotated-password".to_string();
        let second = bootstrap_admin(&db, &config).await.unwrap();
        assert_eq!(second, SeedOutcome::AlreadyPresent);

        assert!(login(&db, "admin", "admin123").await.unwrap());
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_uses_configured_credentials() {
        let db = setup().await;
        let mut config = ConfigState::default();
        config.admin.username = "owner".to_string();
        config.admin.password = "not-the-default".to_string();

        bootstrap_admin(&db, &config).await.unwrap();
        assert!(login(&db, "owner", "not-the-default").await.unwrap());
        assert!(!login(&db, "admin", "admin123").await.unwrap());
    }
}

//! # User Repository
//!
//! Database operations for operator accounts.
//!
//! Digests arrive already hashed; this module never sees a plaintext
//! password.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::format_timestamp;
use stockroom_core::User;

/// Outcome of seeding a bootstrap account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The account was written by this call.
    Created,
    /// An account with that username already existed; nothing was written.
    AlreadyPresent,
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new account.
    ///
    /// ## Returns
    /// * `Ok(User)` - The stored account
    /// * `Err(DbError::Duplicate)` - Username is taken; nothing changed
    pub async fn create(&self, username: &str, password_hash: &str) -> DbResult<User> {
        debug!(username = %username, "Creating user");

        let created_at = Utc::now();

        sqlx::query("INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)")
            .bind(username)
            .bind(password_hash)
            .bind(format_timestamp(created_at))
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::Duplicate { .. } => DbError::duplicate("username", username),
                other => other,
            })?;

        self.find_by_username(username)
            .await?
            .ok_or_else(|| DbError::not_found("User", username))
    }

    /// Gets an account by username.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT username, password_hash, created_at FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Writes the account unless the username already exists.
    ///
    /// Used for bootstrap seeding. Any failure other than the username
    /// being present propagates as an error.
    pub async fn ensure_user(&self, username: &str, password_hash: &str) -> DbResult<SeedOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(username) DO NOTHING
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        let outcome = if result.rows_affected() == 0 {
            SeedOutcome::AlreadyPresent
        } else {
            SeedOutcome::Created
        };

        debug!(username = %username, ?outcome, "Ensured user");
        Ok(outcome)
    }

    /// Counts accounts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = setup().await;

        let user = db.users().create("cashier", "$argon2id$one").await.unwrap();
        assert_eq!(user.username, "cashier");
        assert_eq!(user.password_hash, "$argon2id$one");

        let found = db.users().find_by_username("cashier").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "$argon2id$one");
        assert_eq!(found.created_at, user.created_at);

        assert!(db.users().find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_leaves_state_unchanged() {
        let db = setup().await;
        db.users().create("cashier", "$argon2id$one").await.unwrap();

        let err = db.users().create("cashier", "$argon2id$two").await.unwrap_err();
        match err {
            DbError::Duplicate { field, value } => {
                assert_eq!(field, "username");
                assert_eq!(value, "cashier");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let stored = db.users().find_by_username("cashier").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "$argon2id$one");
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let db = setup().await;

        let first = db.users().ensure_user("admin", "$argon2id$a").await.unwrap();
        let second = db.users().ensure_user("admin", "$argon2id$b").await.unwrap();

        assert_eq!(first, SeedOutcome::Created);
        assert_eq!(second, SeedOutcome::AlreadyPresent);

        let stored = db.users().find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "$argon2id$a");
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ensure_user_propagates_storage_failure() {
        let db = setup().await;
        db.close().await;

        let result = db.users().ensure_user("admin", "$argon2id$a").await;
        assert!(result.is_err());
    }
}

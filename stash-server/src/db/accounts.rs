//! Account database operations

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use stash_common::validators::username_key;
use thiserror::Error;

use super::password::{PasswordError, hash_password, verify_password};
use super::sql::{SQL_ACCOUNT_EXISTS, SQL_DELETE_ACCOUNT, SQL_GET_ACCOUNT, SQL_INSERT_ACCOUNT};

/// Errors from the account store
#[derive(Debug, Error)]
pub enum AccountError {
    /// An account with this username exists (compared case-insensitively)
    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A stored account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    /// Username as typed at sign-up; this is the canonical spelling
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

type AccountRow = (i64, String, String, i64);

impl From<AccountRow> for Account {
    fn from((id, username, password_hash, created_at): AccountRow) -> Self {
        Self {
            id,
            username,
            password_hash,
            created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
        }
    }
}

/// Result of checking a username and password
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Credentials match; carries the canonical username
    Verified(String),
    UnknownUser,
    WrongPassword,
}

/// Database interface for accounts
#[derive(Clone)]
pub struct AccountDb {
    pool: SqlitePool,
    fast_hashing: bool,
}

impl AccountDb {
    /// Create a new AccountDb instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            fast_hashing: false,
        }
    }

    /// Store plaintext-prefixed hashes instead of Argon2 (tests only)
    pub fn set_fast_hashing(&mut self, fast: bool) {
        self.fast_hashing = fast;
    }

    /// Create an account
    ///
    /// Uniqueness is enforced by the database on the lowercased key, so two
    /// concurrent sign-ups for the same name cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::AlreadyExists` if the username is taken in any
    /// letter case.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, AccountError> {
        let password_hash = hash_password(password, self.fast_hashing)?;
        let created_at = Utc::now().timestamp();

        let id = sqlx::query_scalar::<_, i64>(SQL_INSERT_ACCOUNT)
            .bind(username)
            .bind(username_key(username))
            .bind(&password_hash)
            .bind(created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AccountError::AlreadyExists(username.to_string())
                }
                other => AccountError::Database(other),
            })?;

        Ok(Account::from((
            id,
            username.to_string(),
            password_hash,
            created_at,
        )))
    }

    /// Look up an account by username (case-insensitive)
    pub async fn get_account(&self, username: &str) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(SQL_GET_ACCOUNT)
            .bind(username_key(username))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Account::from))
    }

    /// Whether an account exists (case-insensitive)
    pub async fn account_exists(&self, username: &str) -> Result<bool, AccountError> {
        let exists = sqlx::query_scalar::<_, bool>(SQL_ACCOUNT_EXISTS)
            .bind(username_key(username))
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Delete an account (case-insensitive); returns whether one was removed
    pub async fn delete_account(&self, username: &str) -> Result<bool, AccountError> {
        let result = sqlx::query(SQL_DELETE_ACCOUNT)
            .bind(username_key(username))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check a username and password
    ///
    /// # Errors
    ///
    /// Returns an error only for database failures or a corrupt stored hash.
    pub async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Verification, AccountError> {
        let Some(account) = self.get_account(username).await? else {
            return Ok(Verification::UnknownUser);
        };
        if verify_password(password, &account.password_hash)? {
            Ok(Verification::Verified(account.username))
        } else {
            Ok(Verification::WrongPassword)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;

    async fn accounts() -> (AccountDb, tempfile::TempDir) {
        let (pool, dir) = test_pool().await;
        let mut db = AccountDb::new(pool);
        db.set_fast_hashing(true);
        (db, dir)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (db, _dir) = accounts().await;

        let created = db.create_account("Alice", "hunter2").await.unwrap();
        assert_eq!(created.username, "Alice");

        let fetched = db.get_account("alice").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.username, "Alice");
    }

    #[tokio::test]
    async fn test_duplicate_username_any_case() {
        let (db, _dir) = accounts().await;

        db.create_account("alice", "hunter2").await.unwrap();
        let err = db.create_account("ALICE", "other").await.unwrap_err();
        assert!(matches!(err, AccountError::AlreadyExists(name) if name == "ALICE"));
        // The original account is untouched
        assert_eq!(
            db.verify("alice", "hunter2").await.unwrap(),
            Verification::Verified("alice".to_string())
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_non_ascii_case() {
        let (db, _dir) = accounts().await;

        db.create_account("Émile", "pw").await.unwrap();
        let err = db.create_account("émile", "pw").await.unwrap_err();
        assert!(matches!(err, AccountError::AlreadyExists(name) if name == "émile"));
        assert!(db.account_exists("ÉMILE").await.unwrap());
        assert_eq!(
            db.get_account("émile").await.unwrap().unwrap().username,
            "Émile"
        );
    }

    #[tokio::test]
    async fn test_delete_account() {
        let (db, _dir) = accounts().await;
        db.create_account("Bob", "pw").await.unwrap();

        assert!(db.delete_account("BOB").await.unwrap());
        assert!(!db.account_exists("bob").await.unwrap());
        assert!(!db.delete_account("bob").await.unwrap());
        // The name is free again
        db.create_account("bob", "pw").await.unwrap();
    }

    #[tokio::test]
    async fn test_account_exists() {
        let (db, _dir) = accounts().await;

        assert!(!db.account_exists("bob").await.unwrap());
        db.create_account("Bob", "pw").await.unwrap();
        assert!(db.account_exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_verify() {
        let (db, _dir) = accounts().await;
        db.create_account("Alice", "hunter2").await.unwrap();

        assert_eq!(
            db.verify("alice", "hunter2").await.unwrap(),
            Verification::Verified("Alice".to_string())
        );
        assert_eq!(
            db.verify("alice", "wrong").await.unwrap(),
            Verification::WrongPassword
        );
        assert_eq!(
            db.verify("nobody", "hunter2").await.unwrap(),
            Verification::UnknownUser
        );
    }

    #[tokio::test]
    async fn test_create_rejects_bad_password() {
        let (db, _dir) = accounts().await;
        assert!(matches!(
            db.create_account("alice", "").await,
            Err(AccountError::Password(_))
        ));
        assert!(!db.account_exists("alice").await.unwrap());
    }
}

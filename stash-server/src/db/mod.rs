//! Database module for account persistence

mod accounts;
mod password;
mod sql;

pub use accounts::{Account, AccountDb, AccountError, Verification};
pub use password::{PasswordError, hash_password, verify_password};

use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Database handle shared by all connections
///
/// `SqlitePool` is reference counted internally, so cloning is cheap.
#[derive(Clone)]
pub struct Database {
    pub accounts: AccountDb,
}

impl Database {
    /// Create a new Database instance from a migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            accounts: AccountDb::new(pool),
        }
    }

    /// Hash passwords in fast mode (for test servers only)
    pub fn with_fast_hashing(mut self) -> Self {
        self.accounts.set_fast_hashing(true);
        self
    }
}

/// Open (creating if needed) the account database and run migrations
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a migration fails.
pub async fn init_db(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tempfile::TempDir;

    /// Migrated pool backed by a file in a fresh temp dir
    pub async fn test_pool() -> (SqlitePool, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_db(&dir.path().join("accounts.db"))
            .await
            .expect("Failed to create test database");
        (pool, dir)
    }
}

//! SQL query constants for database operations
//!
//! Each query is documented with its parameters and special behaviors.
//! Lookups go through `username_key`, the lowercased form produced by
//! `validators::username_key`.

// ========================================================================
// Account Query Operations
// ========================================================================

/// Insert a new account
///
/// **Parameters:**
/// 1. `username: &str` - Username as typed at sign-up
/// 2. `username_key: &str` - `username_key(username)`
/// 3. `password_hash: &str` - Hash from `hash_password`
/// 4. `created_at: i64` - Unix timestamp (seconds)
///
/// **Returns:** `(id: i64)`
///
/// **Note:** Fails with a unique violation if the key exists.
pub const SQL_INSERT_ACCOUNT: &str = "INSERT INTO accounts \
     (username, username_key, password_hash, created_at) VALUES (?, ?, ?, ?) RETURNING id";

/// Look up an account by username
///
/// **Parameters:**
/// 1. `username_key: &str` - Key of the username to look up
///
/// **Returns:** `(id: i64, username: String, password_hash: String, created_at: i64)`
pub const SQL_GET_ACCOUNT: &str =
    "SELECT id, username, password_hash, created_at FROM accounts WHERE username_key = ?";

/// Check whether an account exists
///
/// **Parameters:**
/// 1. `username_key: &str` - Key of the username to check
///
/// **Returns:** `(exists: bool)`
pub const SQL_ACCOUNT_EXISTS: &str =
    "SELECT EXISTS(SELECT 1 FROM accounts WHERE username_key = ?)";

/// Delete an account
///
/// **Parameters:**
/// 1. `username_key: &str` - Key of the username to delete
///
/// **Note:** Used to undo a sign-up whose storage directory could not be made.
pub const SQL_DELETE_ACCOUNT: &str = "DELETE FROM accounts WHERE username_key = ?";

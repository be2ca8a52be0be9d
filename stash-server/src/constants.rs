//! Server constants: directory names, startup messages, and the
//! human-readable texts carried by error replies

// ========================================================================
// On-disk Layout
// ========================================================================

/// Directory under the platform data dir used when `--root` is not given
pub const SERVER_DIR_NAME: &str = "stashd";

/// Per-user trees live under `{root}/data/`
pub const DATA_DIR_NAME: &str = "data";

/// Holding area for files displaced by an overwrite
pub const TRASH_DIR_NAME: &str = "trash";

/// Account database file name, placed in the storage root by default
pub const DATABASE_FILE_NAME: &str = "accounts.db";

/// Upper bound for `--max-frame-mb`
pub const MAX_FRAME_MB_LIMIT: u32 = 4095;

// ========================================================================
// Startup Messages
// ========================================================================

pub const MSG_BANNER: &str = "stashd v";
pub const MSG_DATABASE: &str = "Database: ";
pub const MSG_STORAGE_ROOT: &str = "Storage: ";
pub const MSG_LISTENING: &str = "Listening on ";
pub const MSG_SHUTDOWN_RECEIVED: &str = "Shutdown signal received";

// ========================================================================
// Startup Errors
// ========================================================================

pub const ERR_NO_DATA_DIR: &str = "Unable to determine the platform data directory";
pub const ERR_CREATE_STORAGE_DIR: &str = "Failed to create storage directory ";
pub const ERR_DATABASE_INIT: &str = "Failed to open the account database: ";
pub const ERR_BIND: &str = "Failed to bind ";
pub const ERR_SIGNAL_HANDLER: &str = "Failed to install the shutdown signal handler";

// ========================================================================
// Reply Messages
// ========================================================================

pub const MSG_SIGN_IN_SUCCESS: &str = "SignIn success";
pub const MSG_SIGN_UP_SUCCESS: &str = "SignUp success";
pub const MSG_SIGN_OUT_SUCCESS: &str = "SignOut success";

pub const ERR_NOT_SIGNED_IN: &str = "Finish signing in to continue";
pub const ERR_PASSWORD_INCORRECT: &str = "The password is incorrect";
pub const ERR_FOLDER_NOT_FOUND: &str = "Folder does not exist";
pub const ERR_FOLDER_EXISTS: &str = "Folder already exists";
pub const ERR_CREATE_FOLDER: &str = "Cannot create folder";
pub const ERR_INVALID_FILENAME: &str = "Invalid filename";
pub const ERR_INVALID_DATA: &str = "Invalid data";
pub const ERR_OPEN_FILE: &str = "Couldn't open the file";
pub const ERR_WRITE_FILE: &str = "Cannot write file";
pub const ERR_DELETE_ROOT: &str = "Cannot delete the root folder";
pub const ERR_DELETE_FILE: &str = "Cannot delete file";
pub const ERR_DELETE_FOLDER: &str = "Cannot delete folder";
pub const ERR_RENAME_UNSUPPORTED: &str = "Renaming is not supported";
pub const ERR_UNKNOWN_REQUEST: &str = "Unknown request";
pub const ERR_GENERIC: &str = "An error occurred";
pub const ERR_INVALID_USERNAME: &str = "Invalid username";
pub const ERR_INVALID_PASSWORD: &str = "Invalid password";

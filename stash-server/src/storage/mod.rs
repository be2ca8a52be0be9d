//! Per-user storage area on disk
//!
//! Layout under the storage root:
//! - `{root}/data/<username>/...` - each account's live tree
//! - `{root}/trash/` - holding area for files displaced by an overwrite

mod path;
mod tree;
mod writer;

pub use path::{PathError, parent_relative, resolve_entry, resolve_existing, user_relative};
pub use tree::build_tree;
pub use writer::{WriteError, write_file_safely};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use stash_common::protocol::StorageNode;

use crate::constants::{
    DATA_DIR_NAME, ERR_CREATE_STORAGE_DIR, ERR_NO_DATA_DIR, SERVER_DIR_NAME, TRASH_DIR_NAME,
};

/// Get the default storage root for the platform
///
/// - **Linux**: `~/.local/share/stashd/`
/// - **macOS**: `~/Library/Application Support/stashd/`
/// - **Windows**: `%APPDATA%\stashd\`
///
/// # Errors
///
/// Returns an error if the platform's data directory cannot be determined.
#[must_use = "storage root result should be used"]
pub fn default_storage_root() -> Result<PathBuf, String> {
    let data_dir = dirs::data_dir().ok_or_else(|| ERR_NO_DATA_DIR.to_string())?;
    Ok(data_dir.join(SERVER_DIR_NAME))
}

/// The data and holding directories, both canonical
#[derive(Debug, Clone)]
pub struct StorageArea {
    data_root: PathBuf,
    trash_root: PathBuf,
}

impl StorageArea {
    /// Create the storage directories under `root` if missing and open them
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or canonicalized.
    pub fn init(root: &Path) -> Result<Self, String> {
        let create = |dir: PathBuf| -> Result<PathBuf, String> {
            fs::create_dir_all(&dir)
                .and_then(|()| dir.canonicalize())
                .map_err(|e| format!("{}{}: {}", ERR_CREATE_STORAGE_DIR, dir.display(), e))
        };

        Ok(Self {
            data_root: create(root.join(DATA_DIR_NAME))?,
            trash_root: create(root.join(TRASH_DIR_NAME))?,
        })
    }

    /// Directory holding every user's tree
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Holding area for the safe writer
    pub fn trash_root(&self) -> &Path {
        &self.trash_root
    }

    /// Canonical root of `username`'s tree
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user has no directory yet.
    pub fn user_root(&self, username: &str) -> io::Result<PathBuf> {
        self.data_root.join(username).canonicalize()
    }

    /// Create `username`'s directory if it is missing
    pub fn ensure_user_root(&self, username: &str) -> io::Result<PathBuf> {
        let root = self.data_root.join(username);
        fs::create_dir_all(&root)?;
        root.canonicalize()
    }

    /// Replace `username`'s directory with an empty one
    ///
    /// Anything already there, such as a tree left from an account removed
    /// out of band, is destroyed.
    pub fn reset_user_root(&self, username: &str) -> io::Result<PathBuf> {
        let root = self.data_root.join(username);
        match fs::remove_dir_all(&root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::create_dir(&root)?;
        root.canonicalize()
    }

    /// Fresh snapshot of `username`'s tree
    pub fn snapshot(&self, username: &str) -> io::Result<StorageNode> {
        build_tree(&self.data_root, username)
    }
}

//! Overwrite-safe file writes
//!
//! Replacing a file happens in two phases. [`stage`] moves any existing file
//! at the target into the holding area, then the new content is written and
//! synced. [`StagedWrite::commit`] discards the held original. Until commit,
//! dropping the [`StagedWrite`] (including after a failed write) removes the
//! partial target and moves the original back, so a failed upload leaves
//! storage as it was.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// Longest file name most filesystems accept, in bytes
const MAX_HELD_NAME_LENGTH: usize = 255;

/// Errors from a staged write
#[derive(Debug, Error)]
pub enum WriteError {
    /// The target is a directory; nothing was moved
    #[error("a directory exists at {}", .0.display())]
    IsDirectory(PathBuf),

    /// The existing file could not be moved into the holding area
    #[error("failed to move the existing file aside: {0}")]
    Stage(#[source] io::Error),

    /// The new content could not be written
    #[error("failed to write the new file: {0}")]
    Write(#[source] io::Error),
}

/// An overwrite in progress
///
/// Rolls back on drop unless [`commit`](Self::commit) was called.
#[derive(Debug)]
pub struct StagedWrite {
    target: PathBuf,
    /// Where the previous file was moved, if there was one
    held: Option<PathBuf>,
    /// Whether this write created the file at `target`
    created: bool,
    committed: bool,
}

/// Name for a held-aside file: `<uuid>-<original name>`
///
/// The UUID keeps concurrent uploads of the same name apart. Falls back to
/// the bare UUID if the combined name would be too long.
fn held_name(target: &Path) -> String {
    let id = Uuid::new_v4();
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let held = format!("{id}-{name}");
    if name.is_empty() || held.len() > MAX_HELD_NAME_LENGTH {
        id.to_string()
    } else {
        held
    }
}

/// Prepare to write `target`, moving any existing file into `holding_dir`
///
/// # Errors
///
/// Returns `WriteError::IsDirectory` if a directory is at `target` (checked
/// before anything moves), or `WriteError::Stage` if the existing file
/// cannot be moved.
pub fn stage(target: &Path, holding_dir: &Path) -> Result<StagedWrite, WriteError> {
    let held = match fs::symlink_metadata(target) {
        Ok(metadata) if metadata.is_dir() => {
            return Err(WriteError::IsDirectory(target.to_path_buf()));
        }
        Ok(_) => {
            let held = holding_dir.join(held_name(target));
            fs::rename(target, &held).map_err(WriteError::Stage)?;
            Some(held)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(WriteError::Stage(e)),
    };

    Ok(StagedWrite {
        target: target.to_path_buf(),
        held,
        created: false,
        committed: false,
    })
}

impl StagedWrite {
    /// Where the previous file is held, if there was one
    #[cfg(test)]
    pub fn held_path(&self) -> Option<&Path> {
        self.held.as_deref()
    }

    /// Create the target and fill it with `fill`, then sync it to disk
    ///
    /// # Errors
    ///
    /// Returns `WriteError::Write` if the file cannot be created, `fill`
    /// fails, or the sync fails. The write is rolled back when `self` drops.
    pub fn write_with<F>(&mut self, fill: F) -> Result<(), WriteError>
    where
        F: FnOnce(&mut fs::File) -> io::Result<()>,
    {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.target)
            .map_err(WriteError::Write)?;
        self.created = true;

        fill(&mut file)
            .and_then(|()| file.sync_all())
            .map_err(WriteError::Write)
    }

    /// Keep the new content and discard the held original
    ///
    /// Failing to delete the held file is logged; the new content stays.
    pub fn commit(mut self) {
        self.committed = true;
        if let Some(held) = self.held.take()
            && let Err(e) = fs::remove_file(&held)
        {
            warn!(path = %held.display(), error = %e, "failed to remove held file");
        }
    }

    fn rollback(&mut self) {
        if self.created
            && let Err(e) = fs::remove_file(&self.target)
            && e.kind() != io::ErrorKind::NotFound
        {
            error!(path = %self.target.display(), error = %e, "failed to remove partial file");
        }

        if let Some(held) = self.held.take()
            && let Err(e) = fs::rename(&held, &self.target)
        {
            error!(
                path = %self.target.display(),
                held = %held.display(),
                error = %e,
                "failed to restore original file"
            );
        }
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}

/// Stage, fill and commit in one call
///
/// # Errors
///
/// Returns the first error; storage is unchanged when it does.
pub fn write_file_safely<F>(target: &Path, holding_dir: &Path, fill: F) -> Result<(), WriteError>
where
    F: FnOnce(&mut fs::File) -> io::Result<()>,
{
    let mut staged = stage(target, holding_dir)?;
    staged.write_with(fill)?;
    staged.commit();
    Ok(())
}

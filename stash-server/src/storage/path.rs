//! Wire path resolution confined to a user's storage root
//!
//! A wire path names an entry as `username/seg/seg`. Resolution happens in
//! two steps: [`user_relative`] checks shape and ownership without touching
//! the filesystem, then [`resolve_existing`] or [`resolve_entry`] maps the
//! remaining segments under the user's canonical root and verifies the
//! result has not escaped it through a symlink.

use std::io;
use std::path::{Path, PathBuf};

use stash_common::validators::validate_file_path;
use thiserror::Error;

/// Error type for path resolution failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Empty, absolute, `..`, or otherwise malformed path
    #[error("invalid path")]
    InvalidPath,
    /// First segment is not the caller's username
    #[error("path is outside the caller's folder")]
    NotOwner,
    /// Resolved path escapes the user's root
    #[error("access denied")]
    AccessDenied,
    #[error("not found")]
    NotFound,
    #[error("failed to resolve path: {0}")]
    CanonicalizeFailed(String),
}

/// Split a wire path and strip the owning username segment
///
/// An empty result means the path names the user's root itself.
///
/// # Errors
///
/// Returns `InvalidPath` for malformed paths and `NotOwner` if the first
/// segment is not exactly `username`.
pub fn user_relative<'a>(username: &str, wire_path: &'a str) -> Result<Vec<&'a str>, PathError> {
    let segments = validate_file_path(wire_path).map_err(|_| PathError::InvalidPath)?;
    if segments[0] != username {
        return Err(PathError::NotOwner);
    }
    Ok(segments[1..].to_vec())
}

/// Like [`user_relative`], but an empty string denotes the user's root
///
/// Used for the `parent` field of `AddFolder` and `AddFile`.
pub fn parent_relative<'a>(username: &str, parent: &'a str) -> Result<Vec<&'a str>, PathError> {
    if parent.is_empty() {
        return Ok(Vec::new());
    }
    user_relative(username, parent)
}

fn join_segments(root: &Path, segments: &[&str]) -> PathBuf {
    let mut path = root.to_path_buf();
    path.extend(segments);
    path
}

fn canonicalize(path: &Path) -> Result<PathBuf, PathError> {
    path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathError::NotFound
        } else {
            PathError::CanonicalizeFailed(e.to_string())
        }
    })
}

/// Resolve an existing entry, following symlinks
///
/// `user_root` must be canonical. The result is canonical and under it.
///
/// # Errors
///
/// Returns `NotFound` if nothing exists at the path and `AccessDenied` if
/// the entry resolves outside `user_root`.
#[must_use = "path resolution result should be used"]
pub fn resolve_existing(user_root: &Path, segments: &[&str]) -> Result<PathBuf, PathError> {
    let canonical = canonicalize(&join_segments(user_root, segments))?;
    if !canonical.starts_with(user_root) {
        return Err(PathError::AccessDenied);
    }
    Ok(canonical)
}

/// Resolve an entry that may not exist, without following its last segment
///
/// The parent directory is canonicalized and checked; the final name is
/// appended as-is. Deleting a symlink through this path removes the link,
/// not what it points at.
///
/// # Errors
///
/// Returns `InvalidPath` for an empty segment list (the root has no parent),
/// `NotFound` if the parent is missing and `AccessDenied` if the parent
/// resolves outside `user_root`.
#[must_use = "path resolution result should be used"]
pub fn resolve_entry(user_root: &Path, segments: &[&str]) -> Result<PathBuf, PathError> {
    let Some((name, parents)) = segments.split_last() else {
        return Err(PathError::InvalidPath);
    };
    let parent = resolve_existing(user_root, parents)?;
    Ok(parent.join(name))
}

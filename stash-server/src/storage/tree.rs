//! Storage tree snapshots
//!
//! Every snapshot is a fresh recursive walk; nothing is cached. Directories
//! come before files at each level, each group sorted by name.

use std::fs;
use std::io;
use std::path::Path;

use stash_common::protocol::StorageNode;

/// Build the tree rooted at `data_root/<username>`
///
/// Node paths are wire paths (`username/...`, `/`-separated on every
/// platform). Symlinks are reported as whatever they point to, but a
/// symlinked directory is listed without descending into it. Entries that
/// disappear during the walk, and dangling links, are left out.
///
/// # Errors
///
/// Returns an error if the user's root or a directory inside it cannot be
/// read for any reason other than having been removed mid-walk.
pub fn build_tree(data_root: &Path, username: &str) -> io::Result<StorageNode> {
    build_directory(&data_root.join(username), username, username.to_string())
}

fn build_directory(dir: &Path, name: &str, wire_path: String) -> io::Result<StorageNode> {
    let mut directories = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };

        let child_name = entry.file_name().to_string_lossy().into_owned();
        let child_path = format!("{wire_path}/{child_name}");
        let path = entry.path();

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };

        if !metadata.is_dir() {
            files.push(StorageNode::file(child_name, child_path, metadata.len()));
            continue;
        }

        let is_link = entry
            .file_type()
            .map(|file_type| file_type.is_symlink())
            .unwrap_or(false);
        if is_link {
            directories.push(StorageNode::directory(child_name, child_path, Vec::new()));
            continue;
        }

        match build_directory(&path, &child_name, child_path) {
            Ok(node) => directories.push(node),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        }
    }

    directories.sort_by(|a, b| a.name.cmp(&b.name));
    files.sort_by(|a, b| a.name.cmp(&b.name));
    directories.append(&mut files);

    Ok(StorageNode::directory(name, wire_path, directories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_common::protocol::NodeKind;
    use tempfile::TempDir;

    fn data_root_with_user() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("alice")).unwrap();
        dir
    }

    #[test]
    fn test_empty_root() {
        let dir = data_root_with_user();
        let tree = build_tree(dir.path(), "alice").unwrap();

        assert_eq!(tree.name, "alice");
        assert_eq!(tree.path, "alice");
        assert_eq!(tree.kind, NodeKind::Directory);
        assert_eq!(tree.children, Some(vec![]));
    }

    #[test]
    fn test_nested_tree_paths_and_sizes() {
        let dir = data_root_with_user();
        let root = dir.path().join("alice");
        fs::create_dir_all(root.join("docs").join("old")).unwrap();
        fs::write(root.join("docs").join("a.txt"), b"hello").unwrap();
        fs::write(root.join("top.bin"), [0u8; 10]).unwrap();

        let tree = build_tree(dir.path(), "alice").unwrap();
        assert_eq!(tree.descendant_count(), 4);

        let docs = tree.find("alice/docs").unwrap();
        assert!(docs.is_dir());
        assert_eq!(docs.name, "docs");

        let a = tree.find("alice/docs/a.txt").unwrap();
        assert_eq!(a.size, Some(5));
        assert!(a.children.is_none());

        let old = tree.find("alice/docs/old").unwrap();
        assert_eq!(old.children, Some(vec![]));

        assert_eq!(tree.find("alice/top.bin").unwrap().size, Some(10));
    }

    #[test]
    fn test_directories_first_then_by_name() {
        let dir = data_root_with_user();
        let root = dir.path().join("alice");
        fs::write(root.join("b.txt"), b"").unwrap();
        fs::write(root.join("a.txt"), b"").unwrap();
        fs::create_dir(root.join("zeta")).unwrap();
        fs::create_dir(root.join("alpha")).unwrap();

        let tree = build_tree(dir.path(), "alice").unwrap();
        let names: Vec<&str> = tree.children().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["alpha", "zeta", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let err = build_tree(dir.path(), "nobody").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        let dir = data_root_with_user();
        let root = dir.path().join("alice");
        fs::write(root.join("real.txt"), b"abc").unwrap();
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt")).unwrap();
        std::os::unix::fs::symlink(&root, root.join("loop")).unwrap();
        std::os::unix::fs::symlink(root.join("gone"), root.join("dangling")).unwrap();

        let tree = build_tree(dir.path(), "alice").unwrap();

        assert_eq!(tree.find("alice/link.txt").unwrap().size, Some(3));
        let looped = tree.find("alice/loop").unwrap();
        assert!(looped.is_dir());
        assert!(looped.children().is_empty());
        assert!(tree.find("alice/dangling").is_none());
    }
}

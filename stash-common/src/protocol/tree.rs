//! Storage tree snapshot sent in tree-carrying responses

use serde::{Deserialize, Serialize};

use super::payload::PayloadError;

/// Whether a node is a file or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "dir")]
    Directory,
}

/// One node of a user's storage tree
///
/// Serialized as `{"name", "path", "type", "size"?, "children"?}`. `size` is
/// present only for files and `children` only for directories (possibly
/// empty). `path` is relative to the storage area, so it always starts with
/// the owner's username; the root node's path is the username itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<StorageNode>>,
}

impl StorageNode {
    /// Create a file node
    pub fn file(name: impl Into<String>, path: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
            size: Some(size),
            children: None,
        }
    }

    /// Create a directory node
    pub fn directory(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Vec<StorageNode>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            size: None,
            children: Some(children),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Child nodes (empty for files)
    pub fn children(&self) -> &[StorageNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Find a descendant (or this node) by its wire path
    pub fn find(&self, path: &str) -> Option<&StorageNode> {
        if self.path == path {
            return Some(self);
        }
        self.children()
            .iter()
            .filter(|child| {
                child.path == path
                    || path
                        .strip_prefix(child.path.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .find_map(|child| child.find(path))
    }

    /// Total number of nodes below this one
    pub fn descendant_count(&self) -> usize {
        self.children()
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Parse a tree from JSON
    pub fn from_json(payload: &[u8]) -> Result<Self, PayloadError> {
        serde_json::from_slice(payload).map_err(|e| PayloadError::InvalidJson(e.to_string()))
    }
}

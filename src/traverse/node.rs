// src/traverse/node.rs
// =============================================================================
// FileNode: one file or directory in the final index, plus the helpers that
// build nodes and put them in a deterministic order.
//
// Ordering rule (used by both traversal strategies and the formatter):
//   - walk both paths component by component
//   - at the first component that differs, a directory beats a file
//   - otherwise components compare case-insensitively, with the raw bytes
//     breaking ties ("a-b" < "B.md" < "b.md")
//   - a path that is a prefix of another comes first (parent before child)
//
// So a directory "z" sorts before a sibling file "a.txt", and every directory
// is immediately followed by its own contents.
// =============================================================================

use serde::Serialize;
use std::cmp::Ordering;

use crate::github::{encode_path, ResolvedTarget};

pub const RAW_BASE: &str = "https://raw.githubusercontent.com";
pub const HTML_BASE: &str = "https://github.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Dir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    /// Always relative to the repository root.
    pub path: String,
    /// Separators between the target's base path and `path`.
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Empty for directories.
    pub url_raw: String,
    pub url_html: String,
}

impl FileNode {
    pub fn is_dir(&self) -> bool {
        self.node_type == NodeType::Dir
    }
}

// Builds a node with its raw and browsable URLs
//
// Example (file "src/main.rs" on ref "main" of octocat/hello):
//   url_raw  = https://raw.githubusercontent.com/octocat/hello/main/src/main.rs
//   url_html = https://github.com/octocat/hello/blob/main/src/main.rs
pub fn build_node(
    target: &ResolvedTarget,
    path: &str,
    name: &str,
    depth: usize,
    node_type: NodeType,
    size: Option<u64>,
) -> FileNode {
    let owner = encode_path(&target.owner);
    let repo = encode_path(&target.repo);
    // Refs like "release/1.x" keep their slashes, matching GitHub's own links.
    let git_ref = encode_path(&target.git_ref);
    let encoded_path = encode_path(path);

    let (url_raw, verb) = match node_type {
        NodeType::File => (
            format!("{RAW_BASE}/{owner}/{repo}/{git_ref}/{encoded_path}"),
            "blob",
        ),
        NodeType::Dir => (String::new(), "tree"),
    };
    let url_html = format!("{HTML_BASE}/{owner}/{repo}/{verb}/{git_ref}/{encoded_path}");

    FileNode {
        node_type,
        name: name.to_string(),
        path: path.to_string(),
        depth,
        size: if node_type == NodeType::File { size } else { None },
        url_raw,
        url_html,
    }
}

/// Number of `/` separators: `"" -> 0`, `"a.ts" -> 0`, `"a/b/c.ts" -> 2`.
pub fn depth_from_relative_path(relative: &str) -> usize {
    if relative.is_empty() {
        return 0;
    }
    relative.matches('/').count()
}

/// Path of `full` relative to `base`.
///
/// Returns `None` when `full` is outside `base` and `Some("")` when they
/// are the same path.
pub fn relative_path<'a>(full: &'a str, base: &str) -> Option<&'a str> {
    if base.is_empty() {
        return Some(full);
    }
    if full == base {
        return Some("");
    }
    full.strip_prefix(base)?.strip_prefix('/')
}

/// Last path component, used as the display name.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// Each component paired with "is this a file?" so directories sort first
fn sort_key(node: &FileNode) -> impl Iterator<Item = (bool, String, &str)> + '_ {
    let last = node.path.split('/').count() - 1;
    node.path.split('/').enumerate().map(move |(i, component)| {
        (
            i == last && node.node_type == NodeType::File,
            component.to_lowercase(),
            component,
        )
    })
}

/// Case-insensitive name order; identical names fall back to byte order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn compare_nodes(a: &FileNode, b: &FileNode) -> Ordering {
    sort_key(a).cmp(sort_key(b))
}

/// Sorts in place with `compare_nodes`.
pub fn sort_nodes(nodes: &mut [FileNode]) {
    nodes.sort_by(compare_nodes);
}

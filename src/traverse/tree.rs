// src/traverse/tree.rs
// =============================================================================
// Bulk strategy: build nodes from one recursive git tree listing.
//
// One request covers the whole repository, so this is the fast path. It's
// only used when GitHub returned the complete listing (truncated = false).
// =============================================================================

use crate::github::{ErrorCode, IndexError, ResolvedTarget, TreeEntry, TreeEntryType};

use super::node::{base_name, build_node, depth_from_relative_path, relative_path, FileNode, NodeType};

/// True when some entry is the base path itself or lives below it.
pub fn tree_has_prefix(entries: &[TreeEntry], base: &str) -> bool {
    if base.is_empty() {
        return true;
    }
    entries
        .iter()
        .any(|entry| relative_path(&entry.path, base).is_some())
}

// Keeps entries under the base path and within the depth limit
//
// blob -> file, tree/commit -> dir (commit = submodule), anything else dropped
pub fn collect_from_tree(
    entries: &[TreeEntry],
    target: &ResolvedTarget,
    max_depth: usize,
) -> Result<Vec<FileNode>, IndexError> {
    let mut nodes = Vec::new();

    for entry in entries {
        let node_type = match entry.kind {
            TreeEntryType::Blob => NodeType::File,
            TreeEntryType::Tree | TreeEntryType::Commit => NodeType::Dir,
            TreeEntryType::Other(_) => continue,
        };

        let relative = match relative_path(&entry.path, &target.path) {
            Some(relative) if !relative.is_empty() => relative,
            _ => continue,
        };

        let depth = depth_from_relative_path(relative);
        if depth > max_depth {
            continue;
        }

        nodes.push(build_node(
            target,
            &entry.path,
            base_name(&entry.path),
            depth,
            node_type,
            entry.size,
        ));
    }

    if nodes.is_empty() && !target.path.is_empty() {
        return Err(IndexError::new(
            ErrorCode::NotFound,
            "The requested path does not contain any files within the selected depth.",
        ));
    }

    Ok(nodes)
}

// src/markdown/header.rs
// The summary block printed above the tree, and document assembly.

use crate::github::{ResolvedTarget, TargetKind, GITHUB_HOST};
use crate::traverse::FileNode;

// Builds the header block:
//
//   # Index for https://github.com/octocat/Hello-World
//   - ref: master
//   - path: /
//   - depth: 1
//   - files: 3
pub fn build_header(
    input: &str,
    target: &ResolvedTarget,
    depth: usize,
    nodes: &[FileNode],
) -> String {
    let files = nodes.iter().filter(|node| !node.is_dir()).count();
    let path = if target.path.is_empty() { "/" } else { target.path.as_str() };

    [
        format!("# Index for {}", source_url(input, target)),
        format!("- ref: {}", target.git_ref),
        format!("- path: {path}"),
        format!("- depth: {depth}"),
        format!("- files: {files}"),
    ]
    .join("\n")
}

/// The user's own URL when they gave one, otherwise a rebuilt github.com URL.
pub fn source_url(input: &str, target: &ResolvedTarget) -> String {
    let input = input.trim();
    if input.contains(GITHUB_HOST) {
        return input.to_string();
    }

    let base = format!("https://{GITHUB_HOST}/{}/{}", target.owner, target.repo);
    if target.kind == TargetKind::Repo {
        return base;
    }

    let suffix = if target.path.is_empty() {
        String::new()
    } else {
        format!("/{}", target.path)
    };
    format!("{base}/{}/{}{suffix}", target.kind.as_str(), target.git_ref)
}

/// Header and tree separated by a blank line; just the header when the tree is empty.
pub fn render_document(header: &str, tree: &str) -> String {
    if tree.is_empty() {
        header.to_string()
    } else {
        format!("{header}\n\n{tree}")
    }
}

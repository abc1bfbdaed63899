// src/traverse/walk.rs
// =============================================================================
// Fallback strategy: walk the repository one directory at a time with the
// contents API.
//
// How it works:
// 1. Start with the base path as the only directory to list
// 2. List every directory of the current level (several requests in flight)
// 3. Turn each child into a node if it's within the depth limit
// 4. Child directories that are shallower than the limit form the next level
// 5. Repeat until there is nothing left to list
//
// This costs one request per directory, so it's only used when the bulk
// listing came back truncated.
//
// Rust concepts:
// - Streams: `buffered(n)` keeps at most n requests in flight
// - try_collect: the first failed request stops the whole walk
// =============================================================================

use futures::stream::{self, StreamExt, TryStreamExt};
use std::cmp::Ordering;
use tracing::debug;

use crate::github::transport::HttpTransport;
use crate::github::{ContentFile, ContentType, ErrorCode, GitHubApi, IndexError, ResolvedTarget};

use super::node::{
    build_node, compare_names, depth_from_relative_path, relative_path, FileNode, NodeType,
};

// Walks directories level by level, starting at the target's base path
pub async fn walk_directories<T: HttpTransport>(
    api: &GitHubApi<T>,
    target: &ResolvedTarget,
    max_depth: usize,
    concurrency: usize,
) -> Result<Vec<FileNode>, IndexError> {
    let mut nodes = Vec::new();
    let mut frontier = vec![target.path.clone()];
    let mut requests = 0usize;

    while !frontier.is_empty() {
        requests += frontier.len();
        debug!(directories = frontier.len(), "Listing directory level");

        // `buffered` (not `buffer_unordered`) so listings come back in
        // frontier order and the walk stays deterministic.
        let listings: Vec<Vec<ContentFile>> = stream::iter(frontier.iter())
            .map(move |path| api.list_contents(&target.owner, &target.repo, &target.git_ref, path))
            .buffered(concurrency.max(1))
            .try_collect()
            .await?;

        let mut next = Vec::new();
        for mut entries in listings {
            entries.sort_by(compare_contents);

            for entry in entries {
                let Some(relative) = relative_path(&entry.path, &target.path) else {
                    continue;
                };
                if relative.is_empty() {
                    continue;
                }

                let depth = depth_from_relative_path(relative);
                if depth > max_depth {
                    continue;
                }

                let node_type = match entry.kind {
                    ContentType::File | ContentType::Symlink => NodeType::File,
                    ContentType::Dir | ContentType::Submodule => NodeType::Dir,
                    ContentType::Other(_) => continue,
                };

                nodes.push(build_node(
                    target,
                    &entry.path,
                    &entry.name,
                    depth,
                    node_type,
                    entry.size,
                ));

                // Submodules have no listing of their own in this repository.
                if entry.kind == ContentType::Dir && depth < max_depth {
                    next.push(entry.path);
                }
            }
        }

        frontier = next;
    }

    debug!(requests, nodes = nodes.len(), "Directory walk finished");

    if nodes.is_empty() && !target.path.is_empty() {
        return Err(IndexError::new(
            ErrorCode::NotFound,
            "The requested path does not contain any files within the selected depth.",
        ));
    }

    Ok(nodes)
}

// Directories first, then by name
fn compare_contents(a: &ContentFile, b: &ContentFile) -> Ordering {
    let is_dir = |c: &ContentFile| matches!(c.kind, ContentType::Dir | ContentType::Submodule);
    is_dir(b)
        .cmp(&is_dir(a))
        .then_with(|| compare_names(&a.name, &b.name))
}

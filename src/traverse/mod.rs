// src/traverse/mod.rs
// =============================================================================
// Turns a resolved target into the flat, sorted list of FileNodes.
//
// Strategies:
// - blob targets: one request for the single file
// - tree/repo targets: the recursive git tree listing (tree.rs), or, when
//   GitHub says that listing was truncated, a directory walk (walk.rs)
//
// Both strategies apply the same depth rule and build nodes the same way,
// so for a repository small enough to list in one go they return the same
// set of paths.
// =============================================================================

mod node;
mod tree;
mod walk;

pub use node::{build_node, sort_nodes, FileNode, NodeType};

use tracing::{debug, info, warn};

use crate::github::transport::HttpTransport;
use crate::github::{ContentType, ErrorCode, GitHubApi, IndexError, ResolvedTarget, TargetKind};

/// Directory listings kept in flight during the fallback walk.
pub const DEFAULT_WALK_CONCURRENCY: usize = 8;

// Normalizes a user-supplied depth: NaN, infinities and negatives become 0,
// fractions are floored
pub fn normalize_depth(value: f64) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.floor() as usize
}

// Lists everything under the target, at most `max_depth` levels below it
//
// Returns the nodes sorted (see node.rs for the ordering). On error nothing
// is returned: there are no partial results.
pub async fn traverse<T: HttpTransport>(
    api: &GitHubApi<T>,
    target: &ResolvedTarget,
    max_depth: f64,
    concurrency: usize,
) -> Result<Vec<FileNode>, IndexError> {
    let max_depth = normalize_depth(max_depth);

    if target.kind == TargetKind::Blob {
        return traverse_blob(api, target).await;
    }

    let listing = api
        .fetch_tree(&target.owner, &target.repo, &target.git_ref)
        .await?;

    let mut nodes = if listing.truncated {
        warn!(
            repo = %format!("{}/{}", target.owner, target.repo),
            "Tree listing truncated, walking directories instead"
        );
        walk::walk_directories(api, target, max_depth, concurrency).await?
    } else {
        if !tree::tree_has_prefix(&listing.entries, &target.path) {
            return Err(IndexError::new(
                ErrorCode::NotFound,
                "The requested path does not exist in this ref.",
            ));
        }
        tree::collect_from_tree(&listing.entries, target, max_depth)?
    };

    sort_nodes(&mut nodes);
    info!(
        nodes = nodes.len(),
        max_depth,
        truncated = listing.truncated,
        "Traversal complete"
    );
    Ok(nodes)
}

async fn traverse_blob<T: HttpTransport>(
    api: &GitHubApi<T>,
    target: &ResolvedTarget,
) -> Result<Vec<FileNode>, IndexError> {
    let content = api
        .fetch_content(&target.owner, &target.repo, &target.git_ref, &target.path)
        .await?;
    debug!(path = %content.path, download_url = ?content.download_url, "Fetched blob metadata");

    match &content.kind {
        ContentType::File => Ok(vec![build_node(
            target,
            &content.path,
            &content.name,
            0,
            NodeType::File,
            content.size,
        )]),
        ContentType::Dir => Err(IndexError::new(
            ErrorCode::ExpectedFile,
            "The provided blob URL points to a directory. Use a tree URL instead.",
        )),
        other => Err(IndexError::new(
            ErrorCode::UnsupportedBlob,
            format!("Unsupported blob type: {}.", other.as_str()),
        )),
    }
}

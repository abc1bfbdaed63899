// src/markdown/format.rs
// =============================================================================
// Renders FileNodes as a nested Markdown list.
//
// Output looks like:
//
//   - src/ — [HTML](https://github.com/o/r/tree/main/src)
//     - `main.rs` — [RAW](https://raw...) · [HTML](https://github.com/...) (1.2 KB)
//   - `README.md` — [RAW](...) · [HTML](...) (512 B)
//
// Two spaces of indentation per depth level.
// =============================================================================

use crate::traverse::{sort_nodes, FileNode, NodeType};

const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

// Formats nodes as Markdown, one line per node
//
// The input is re-sorted, so callers don't have to pass sorted nodes.
pub fn format_tree(nodes: &[FileNode]) -> String {
    let mut sorted = nodes.to_vec();
    sort_nodes(&mut sorted);

    sorted
        .iter()
        .map(|node| match node.node_type {
            NodeType::Dir => format_directory(node),
            NodeType::File => format_file(node),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn format_file(node: &FileNode) -> String {
    let size = node
        .size
        .map(|bytes| format!(" ({})", format_bytes(bytes)))
        .unwrap_or_default();
    format!(
        "{}- `{}` — [RAW]({}) · [HTML]({}){}",
        indent(node.depth),
        node.name,
        node.url_raw,
        node.url_html,
        size
    )
}

fn format_directory(node: &FileNode) -> String {
    let link = if node.url_html.is_empty() {
        String::new()
    } else {
        format!(" — [HTML]({})", node.url_html)
    };
    format!("{}- {}/{}", indent(node.depth), node.name, link)
}

/// Human-readable size with 1024 scaling: `512 B`, `1.5 KB`, `3.0 MB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    value /= 1024.0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

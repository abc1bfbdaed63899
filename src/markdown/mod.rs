// src/markdown/mod.rs
// =============================================================================
// Markdown output.
//
// Submodules:
// - format: the nested list of files and directories
// - header: the summary block and the final document
// =============================================================================

mod format;
mod header;

pub use format::format_tree;
pub use header::{build_header, render_document};

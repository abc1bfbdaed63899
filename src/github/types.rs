// src/github/types.rs
// =============================================================================
// Raw payloads returned by the GitHub REST API.
//
// These are only used while a traversal is running; the rest of the crate
// works with FileNode (see src/traverse/node.rs).
//
// GitHub may add new entry types at any time, so unknown `type` strings are
// kept as `Other(..)` instead of failing deserialization.
// =============================================================================

use serde::Deserialize;

/// `type` of an entry in the recursive git tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TreeEntryType {
    Blob,
    Tree,
    Commit,
    Other(String),
}

impl From<String> for TreeEntryType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "blob" => TreeEntryType::Blob,
            "tree" => TreeEntryType::Tree,
            "commit" => TreeEntryType::Commit,
            _ => TreeEntryType::Other(value),
        }
    }
}

impl Default for TreeEntryType {
    fn default() -> Self {
        TreeEntryType::Other(String::new())
    }
}

/// One entry of `GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: TreeEntryType,
    #[serde(default)]
    pub size: Option<u64>,
}

/// The whole recursive listing. `truncated` is GitHub's signal that the
/// repository was too large to list in one response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeListing {
    #[serde(rename = "tree")]
    pub entries: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

/// `type` of an item from the contents API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ContentType {
    File,
    Dir,
    Symlink,
    Submodule,
    Other(String),
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "file" => ContentType::File,
            "dir" => ContentType::Dir,
            "symlink" => ContentType::Symlink,
            "submodule" => ContentType::Submodule,
            _ => ContentType::Other(value),
        }
    }
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            ContentType::File => "file",
            ContentType::Dir => "dir",
            ContentType::Symlink => "symlink",
            ContentType::Submodule => "submodule",
            ContentType::Other(raw) => raw,
        }
    }
}

/// One item of `GET /repos/{owner}/{repo}/contents/{path}?ref={ref}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentFile {
    #[serde(rename = "type")]
    pub kind: ContentType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub download_url: Option<String>,
}

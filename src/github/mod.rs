// src/github/mod.rs
// =============================================================================
// Everything that knows about GitHub: parsing repository references,
// talking to the REST API, and the error type shared by the whole crate.
//
// Submodules:
// - target: turns "owner/repo" or a github.com URL into a ParsedTarget
// - api: the gateway for the three REST endpoints we use
// - transport: the HTTP boundary (reqwest in production, a mock in tests)
// - types: raw API payloads
// - encode: percent-encoding shared by API paths and generated links
// - error: IndexError, the single error shape
// =============================================================================

mod api;
mod encode;
mod error;
mod target;
pub mod transport;
mod types;

pub use api::{GitHubApi, DEFAULT_API_BASE};
pub use encode::encode_path;
pub use error::{ErrorCode, IndexError};
pub use target::{parse_target, ResolvedTarget, TargetKind, GITHUB_HOST};
pub use types::{ContentFile, ContentType, TreeEntry, TreeEntryType};

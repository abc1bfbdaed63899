// src/github/target.rs
// =============================================================================
// Parses whatever the user typed into a structured repository target.
//
// Supported formats:
//   - https://github.com/owner/repo            (kind = repo)
//   - https://github.com/owner/repo.git        (".git" is stripped)
//   - https://github.com/owner/repo/tree/<ref>/<path...>
//   - https://github.com/owner/repo/blob/<ref>/<path...>
//   - github.com/owner/repo...                 (scheme added for you)
//   - owner/repo                               (host added for you)
//
// Everything here is pure: no network access happens until a target has
// been fully validated.
//
// Rust concepts:
// - Url: the `url` crate does the heavy lifting of URL syntax
// - Result: every rejection is an IndexError with a specific code
// =============================================================================

use percent_encoding::percent_decode_str;
use serde::Serialize;
use url::Url;

use super::error::{ErrorCode, IndexError};

pub const GITHUB_HOST: &str = "github.com";

/// What part of a repository the target points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Repo,
    Tree,
    Blob,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Repo => "repo",
            TargetKind::Tree => "tree",
            TargetKind::Blob => "blob",
        }
    }
}

/// A validated repository location. `git_ref` is only `None` for bare repo
/// targets, which need the default branch looked up before traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTarget {
    pub owner: String,
    pub repo: String,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    pub path: String,
    pub kind: TargetKind,
}

/// A target whose ref is known. Traversal only accepts this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    pub owner: String,
    pub repo: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub path: String,
    pub kind: TargetKind,
}

impl ParsedTarget {
    /// Attaches a ref (usually the default branch) to the target.
    pub fn resolve(self, git_ref: impl Into<String>) -> ResolvedTarget {
        ResolvedTarget {
            owner: self.owner,
            repo: self.repo,
            git_ref: git_ref.into(),
            path: self.path,
            kind: self.kind,
        }
    }

    /// Converts a target that already carries its ref.
    pub fn into_resolved(self) -> Result<ResolvedTarget, IndexError> {
        match self.git_ref.clone() {
            Some(git_ref) => Ok(self.resolve(git_ref)),
            None => Err(IndexError::new(
                ErrorCode::MissingRef,
                "Traversal requires a resolved Git ref.",
            )),
        }
    }
}

// Parses raw user input into a ParsedTarget
//
// Example:
//   "https://github.com/octocat/Hello-World/tree/main/src/lib"
//     -> owner "octocat", repo "Hello-World", kind Tree, ref "main", path "src/lib"
pub fn parse_target(input: &str) -> Result<ParsedTarget, IndexError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(parse_error(
            ErrorCode::InvalidInput,
            "Provide a GitHub repository URL or path.",
        ));
    }

    let url = ensure_url(input).ok_or_else(|| {
        parse_error(
            ErrorCode::InvalidUrl,
            "Unable to parse the GitHub URL. Check the format and try again.",
        )
    })?;

    let host_ok = url
        .host_str()
        .map(|host| host.eq_ignore_ascii_case(GITHUB_HOST))
        .unwrap_or(false);
    if !host_ok {
        return Err(parse_error(
            ErrorCode::InvalidHost,
            "Only github.com URLs are supported.",
        ));
    }

    let segments: Vec<String> = url
        .path_segments()
        .map(|split| {
            split
                .filter(|segment| !segment.is_empty())
                .map(decode_segment)
                .collect()
        })
        .unwrap_or_default();

    if segments.len() < 2 {
        return Err(parse_error(
            ErrorCode::InvalidPath,
            "Expected a path like github.com/owner/repo.",
        ));
    }

    let owner = segments[0].clone();
    let repo = strip_git_suffix(&segments[1]).to_string();
    if owner.is_empty() || repo.is_empty() {
        return Err(parse_error(
            ErrorCode::InvalidPath,
            "Missing repository owner or name in URL.",
        ));
    }

    let kind = detect_kind(segments.get(2).map(String::as_str));
    if kind == TargetKind::Repo {
        // Anything past owner/repo that isn't tree/blob (e.g. /releases) is rejected.
        if segments.len() > 2 {
            return Err(parse_error(
                ErrorCode::UnsupportedPath,
                "Only repo, tree, or blob URLs are supported.",
            ));
        }
        return Ok(ParsedTarget {
            owner,
            repo,
            git_ref: None,
            path: String::new(),
            kind,
        });
    }

    let git_ref = segments.get(3).cloned().ok_or_else(|| {
        parse_error(
            ErrorCode::InvalidRef,
            "The URL is missing a branch, tag, or commit ref.",
        )
    })?;
    let path = segments[4..].join("/");

    if kind == TargetKind::Blob && path.is_empty() {
        return Err(parse_error(
            ErrorCode::InvalidPath,
            "Blob URLs must include a file path.",
        ));
    }

    Ok(ParsedTarget {
        owner,
        repo,
        git_ref: Some(git_ref),
        path,
        kind,
    })
}

fn parse_error(code: ErrorCode, message: &str) -> IndexError {
    IndexError::new(code, message).with_status(400)
}

// Parses the input as a URL, coercing scheme-less shorthand first.
//
//   "octocat/Hello-World"            -> "https://github.com/octocat/Hello-World"
//   "github.com/octocat/Hello-World" -> "https://github.com/octocat/Hello-World"
fn ensure_url(value: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(value) {
        return Some(url);
    }
    if has_scheme(value) {
        return None;
    }

    let prefixed = if value.starts_with(&format!("{GITHUB_HOST}/")) {
        format!("https://{value}")
    } else {
        format!("https://{GITHUB_HOST}/{value}")
    };
    Url::parse(&prefixed).ok()
}

// True when the text starts with `letter (letter|digit|+|.|-)* :`
fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-')),
        _ => false,
    }
}

// Percent-decodes one path segment; invalid UTF-8 keeps the raw segment.
fn decode_segment(segment: &str) -> String {
    match percent_decode_str(segment).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    }
}

fn detect_kind(segment: Option<&str>) -> TargetKind {
    match segment {
        Some("tree") => TargetKind::Tree,
        Some("blob") => TargetKind::Blob,
        _ => TargetKind::Repo,
    }
}

fn strip_git_suffix(repo: &str) -> &str {
    repo.strip_suffix(".git").unwrap_or(repo)
}

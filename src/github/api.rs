// src/github/api.rs
// =============================================================================
// The GitHub gateway: the only place that talks to api.github.com.
//
// Endpoints used:
//   - GET /repos/{owner}/{repo}                              (default branch)
//   - GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1  (bulk listing)
//   - GET /repos/{owner}/{repo}/contents/{path}?ref={ref}    (one directory/file)
//
// Every failure is turned into an IndexError here, so callers never have to
// look at HTTP status codes or headers themselves. A rate-limited response,
// for example, becomes `rate_limit` with the seconds until reset attached.
//
// Rust concepts:
// - Generics: GitHubApi<T> works with any HttpTransport (real or mock)
// - serde_json::Value: payloads are checked for shape before deserializing
// =============================================================================

use serde_json::Value;
use tracing::debug;

use super::encode::{encode_component, encode_path};
use super::error::{ErrorCode, ErrorDetails, IndexError};
use super::target::ParsedTarget;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use super::types::{ContentFile, TreeListing};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const USER_AGENT: &str = "repo-indexer";

/// Client for the three GitHub endpoints the indexer needs.
pub struct GitHubApi<T> {
    transport: T,
    api_base: String,
    token: Option<String>,
}

impl<T: HttpTransport> GitHubApi<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
        }
    }

    /// Points the client at another API root (GitHub Enterprise, proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Sends `Authorization: Bearer <token>` on every request. Empty tokens are ignored.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    // Returns the target's ref, or looks up the repository's default branch
    pub async fn resolve_ref(&self, target: &ParsedTarget) -> Result<String, IndexError> {
        if let Some(git_ref) = &target.git_ref {
            return Ok(git_ref.clone());
        }

        let data = self.get_json(&repo_path(&target.owner, &target.repo)).await?;

        match data.get("default_branch").and_then(Value::as_str) {
            Some(branch) => {
                debug!(owner = %target.owner, repo = %target.repo, branch, "Resolved default branch");
                Ok(branch.to_string())
            }
            None => Err(IndexError::new(
                ErrorCode::MissingDefaultBranch,
                "Unable to determine the default branch for the repository.",
            )),
        }
    }

    // Fetches the recursive tree listing for a ref
    pub async fn fetch_tree(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> Result<TreeListing, IndexError> {
        let path = format!(
            "{}/git/trees/{}?recursive=1",
            repo_path(owner, repo),
            encode_component(git_ref)
        );
        let data = self.get_json(&path).await?;

        if !data.get("tree").map(Value::is_array).unwrap_or(false) {
            return Err(unexpected_payload("tree"));
        }
        serde_json::from_value(data).map_err(|_| unexpected_payload("tree"))
    }

    // Lists the immediate children of a directory
    pub async fn list_contents(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<Vec<ContentFile>, IndexError> {
        let data = self.get_json(&contents_path(owner, repo, git_ref, path)).await?;

        if !data.is_array() {
            return Err(IndexError::new(
                ErrorCode::NotADirectory,
                "Expected a directory listing but received a file.",
            ));
        }
        serde_json::from_value(data).map_err(|_| unexpected_payload("directory"))
    }

    // Fetches metadata for a single path (used for blob targets)
    pub async fn fetch_content(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<ContentFile, IndexError> {
        let data = self.get_json(&contents_path(owner, repo, git_ref, path)).await?;

        if !data.get("type").map(Value::is_string).unwrap_or(false) {
            return Err(unexpected_payload("content"));
        }
        serde_json::from_value(data).map_err(|_| unexpected_payload("content"))
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Accept".to_string(), "application/vnd.github+json".to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ];
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }

    // Issues one GET and returns the parsed JSON body, or a normalized error
    async fn get_json(&self, path: &str) -> Result<Value, IndexError> {
        let url = format!("{}{}", self.api_base, path);
        debug!(url = %url, "GitHub API request");

        let request = HttpRequest {
            url,
            headers: self.headers(),
        };
        let response = self.transport.get(request).await.map_err(|e| {
            debug!(error = %e, "GitHub transport failure");
            IndexError::new(
                ErrorCode::NetworkError,
                "Unable to reach GitHub. Check your connection and try again.",
            )
            .with_status(503)
        })?;

        if !response.is_success() {
            return Err(normalize_error(&response, chrono::Utc::now().timestamp()));
        }

        serde_json::from_slice(&response.body).map_err(|_| {
            IndexError::new(ErrorCode::InvalidResponse, "Unexpected response from GitHub API.")
                .with_status(response.status)
        })
    }
}

fn repo_path(owner: &str, repo: &str) -> String {
    format!("/repos/{}/{}", encode_component(owner), encode_component(repo))
}

fn contents_path(owner: &str, repo: &str, git_ref: &str, path: &str) -> String {
    let encoded = encode_path(path);
    let suffix = if encoded.is_empty() {
        String::new()
    } else {
        format!("/{encoded}")
    };
    format!(
        "{}/contents{}?ref={}",
        repo_path(owner, repo),
        suffix,
        encode_component(git_ref)
    )
}

fn unexpected_payload(what: &str) -> IndexError {
    IndexError::new(
        ErrorCode::InvalidResponse,
        format!("GitHub returned an unexpected {what} payload."),
    )
}

// Turns a non-2xx response into an IndexError
//
// `now` is the current Unix time in seconds; it's a parameter so the
// reset-time arithmetic can be tested.
pub fn normalize_error(response: &HttpResponse, now: i64) -> IndexError {
    let status = response.status;
    let body: Option<Value> = serde_json::from_slice(&response.body).ok();
    let body_field = |name: &str| {
        body.as_ref()
            .and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let mut message = match body_field("message") {
        Some(message) => message,
        None if status == 404 => "The requested repository or path could not be found.".to_string(),
        None => format!("GitHub API request failed with status {status}."),
    };

    let remaining = response
        .header("x-ratelimit-remaining")
        .and_then(|v| v.trim().parse::<u64>().ok());
    let reset = response
        .header("x-ratelimit-reset")
        .and_then(|v| v.trim().parse::<i64>().ok());
    let retry_after = retry_after_seconds(response, now);

    let code = match status {
        401 => {
            message = "GitHub rejected the request. Check if the repository is private or if the token is invalid."
                .to_string();
            ErrorCode::Unauthorized
        }
        403 if remaining == Some(0) => {
            message = match retry_after.filter(|s| *s > 0) {
                Some(seconds) => {
                    format!("GitHub rate limit exceeded. Try again in about {seconds} seconds.")
                }
                None => "GitHub rate limit exceeded.".to_string(),
            };
            ErrorCode::RateLimit
        }
        403 => {
            if let Some(seconds) = retry_after.filter(|s| *s > 0) {
                message = format!(
                    "GitHub is temporarily throttling requests. Retry in {seconds} seconds."
                );
            }
            ErrorCode::Forbidden
        }
        404 => ErrorCode::NotFound,
        _ => ErrorCode::GithubError,
    };

    debug!(status, code = %code, "GitHub API error");

    IndexError::new(code, message)
        .with_status(status)
        .with_details(ErrorDetails {
            rate_limit_remaining: remaining,
            rate_limit_reset: reset,
            retry_after_seconds: retry_after,
            documentation_url: body_field("documentation_url"),
        })
}

// Seconds until a retry is allowed: `retry-after` wins, otherwise the
// distance to `x-ratelimit-reset`. Never negative.
fn retry_after_seconds(response: &HttpResponse, now: i64) -> Option<u64> {
    if let Some(seconds) = response
        .header("retry-after")
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|s| s.is_finite() && *s >= 0.0)
    {
        return Some(seconds.ceil() as u64);
    }

    response
        .header("x-ratelimit-reset")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(|reset| reset.saturating_sub(now).max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::target::parse_target;
    use crate::github::transport::MockTransport;
    use crate::github::types::{ContentType, TreeEntryType};
    use serde_json::json;

    const API: &str = "https://api.github.com";

    fn response(status: u16, headers: &[(&str, &str)], body: Value) -> HttpResponse {
        HttpResponse {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_string().into_bytes(),
        }
    }

    #[test]
    fn test_rate_limit_uses_reset_header() {
        let resp = response(
            403,
            &[("x-ratelimit-remaining", "0"), ("x-ratelimit-reset", "1060")],
            json!({"message": "API rate limit exceeded", "documentation_url": "https://docs.github.com/rate"}),
        );
        let err = normalize_error(&resp, 1000);

        assert_eq!(err.code, ErrorCode::RateLimit);
        assert_eq!(err.status, Some(403));
        assert!(err.message.contains("60 seconds"));
        let details = err.details.unwrap();
        assert_eq!(details.rate_limit_remaining, Some(0));
        assert_eq!(details.rate_limit_reset, Some(1060));
        assert_eq!(details.retry_after_seconds, Some(60));
        assert_eq!(details.documentation_url.as_deref(), Some("https://docs.github.com/rate"));
    }

    #[test]
    fn test_rate_limit_reset_in_past_is_clamped() {
        let resp = response(
            403,
            &[("x-ratelimit-remaining", "0"), ("x-ratelimit-reset", "900")],
            json!({}),
        );
        let err = normalize_error(&resp, 1000);
        assert_eq!(err.code, ErrorCode::RateLimit);
        assert_eq!(err.retry_after_seconds(), Some(0));
        assert_eq!(err.message, "GitHub rate limit exceeded.");
    }

    #[test]
    fn test_extreme_reset_header_does_not_overflow() {
        let resp = response(
            403,
            &[
                ("x-ratelimit-remaining", "0"),
                ("x-ratelimit-reset", "-9223372036854775808"),
            ],
            json!({}),
        );
        let err = normalize_error(&resp, 1000);
        assert_eq!(err.retry_after_seconds(), Some(0));
        assert_eq!(err.message, "GitHub rate limit exceeded.");
    }

    #[test]
    fn test_retry_after_wins_over_reset() {
        let resp = response(
            403,
            &[
                ("x-ratelimit-remaining", "0"),
                ("x-ratelimit-reset", "5000"),
                ("Retry-After", "12"),
            ],
            json!({}),
        );
        assert_eq!(normalize_error(&resp, 1000).retry_after_seconds(), Some(12));
    }

    #[test]
    fn test_forbidden_with_and_without_retry_after() {
        let throttled = response(403, &[("retry-after", "30")], json!({"message": "secondary"}));
        let err = normalize_error(&throttled, 0);
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(err.message.contains("Retry in 30 seconds"));

        let plain = response(403, &[], json!({"message": "Resource not accessible"}));
        let err = normalize_error(&plain, 0);
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(err.message, "Resource not accessible");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(normalize_error(&response(401, &[], json!({})), 0).code, ErrorCode::Unauthorized);
        let not_found = normalize_error(&response(404, &[], json!(null)), 0);
        assert_eq!(not_found.code, ErrorCode::NotFound);
        assert_eq!(not_found.message, "The requested repository or path could not be found.");

        let server = normalize_error(&response(502, &[], json!({"message": "Server Error"})), 0);
        assert_eq!(server.code, ErrorCode::GithubError);
        assert_eq!(server.message, "Server Error");
        assert_eq!(server.status, Some(502));
    }

    #[tokio::test]
    async fn test_resolve_ref_reads_default_branch() {
        let transport = MockTransport::new();
        transport.respond_json(
            format!("{API}/repos/octocat/Hello-World"),
            200,
            json!({"default_branch": "master"}),
        );
        let api = GitHubApi::new(transport.clone()).with_token(Some("secret".to_string()));

        let target = parse_target("octocat/Hello-World").unwrap();
        assert_eq!(api.resolve_ref(&target).await.unwrap(), "master");

        let request = &transport.requests()[0];
        let auth = crate::github::transport::header_get(&request.headers, "authorization");
        assert_eq!(auth, Some("Bearer secret"));
    }

    #[tokio::test]
    async fn test_resolve_ref_skips_network_when_ref_known() {
        let transport = MockTransport::new();
        let api = GitHubApi::new(transport.clone());
        let target = parse_target("https://github.com/o/r/tree/dev").unwrap();

        assert_eq!(api.resolve_ref(&target).await.unwrap(), "dev");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_ref_missing_default_branch() {
        let transport = MockTransport::new();
        transport.respond_json(format!("{API}/repos/o/r"), 200, json!({"default_branch": 7}));
        let api = GitHubApi::new(transport);

        let target = parse_target("o/r").unwrap();
        let err = api.resolve_ref(&target).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingDefaultBranch);
    }

    #[tokio::test]
    async fn test_network_failure_is_normalized() {
        let transport = MockTransport::new();
        transport.fail(format!("{API}/repos/o/r"), "connection refused");
        let api = GitHubApi::new(transport);

        let err = api.resolve_ref(&parse_target("o/r").unwrap()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert_eq!(err.status, Some(503));
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let transport = MockTransport::new();
        transport.respond(
            format!("{API}/repos/o/r"),
            HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: b"<html>".to_vec(),
            },
        );
        let api = GitHubApi::new(transport);

        let err = api.resolve_ref(&parse_target("o/r").unwrap()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResponse);
    }

    #[tokio::test]
    async fn test_fetch_tree_encodes_ref() {
        let transport = MockTransport::new();
        transport.respond_json(
            format!("{API}/repos/o/r/git/trees/feature%2Fx?recursive=1"),
            200,
            json!({"tree": [{"path": "a.txt", "type": "blob", "size": 3}], "truncated": true}),
        );
        let api = GitHubApi::new(transport);

        let listing = api.fetch_tree("o", "r", "feature/x").await.unwrap();
        assert!(listing.truncated);
        assert_eq!(listing.entries[0].kind, TreeEntryType::Blob);
    }

    #[tokio::test]
    async fn test_fetch_tree_rejects_bad_payload() {
        let transport = MockTransport::new();
        transport.respond_json(
            format!("{API}/repos/o/r/git/trees/main?recursive=1"),
            200,
            json!({"tree": "nope"}),
        );
        let api = GitHubApi::new(transport);

        let err = api.fetch_tree("o", "r", "main").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResponse);
    }

    #[tokio::test]
    async fn test_list_contents_requires_array() {
        let transport = MockTransport::new();
        transport.respond_json(
            format!("{API}/repos/o/r/contents/docs/my%20file.md?ref=main"),
            200,
            json!({"type": "file", "name": "my file.md", "path": "docs/my file.md"}),
        );
        transport.respond_json(
            format!("{API}/repos/o/r/contents?ref=main"),
            200,
            json!([{"type": "dir", "name": "docs", "path": "docs"}]),
        );
        let api = GitHubApi::new(transport);

        let err = api
            .list_contents("o", "r", "main", "docs/my file.md")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotADirectory);

        let root = api.list_contents("o", "r", "main", "").await.unwrap();
        assert_eq!(root[0].kind, ContentType::Dir);

        let file = api
            .fetch_content("o", "r", "main", "docs/my file.md")
            .await
            .unwrap();
        assert_eq!(file.kind, ContentType::File);
    }

    #[tokio::test]
    async fn test_fetch_content_requires_string_type() {
        let transport = MockTransport::new();
        transport.respond_json(
            format!("{API}/repos/o/r/contents/a.txt?ref=main"),
            200,
            json!({"type": 3, "name": "a.txt", "path": "a.txt"}),
        );
        transport.respond_json(
            format!("{API}/repos/o/r/contents/b.txt?ref=main"),
            200,
            json!({"name": "b.txt", "path": "b.txt"}),
        );
        let api = GitHubApi::new(transport);

        let err = api.fetch_content("o", "r", "main", "a.txt").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResponse);
        let err = api.fetch_content("o", "r", "main", "b.txt").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidResponse);
    }

    #[tokio::test]
    async fn test_custom_api_base() {
        let transport = MockTransport::new();
        transport.respond_json(
            "https://ghe.example.com/api/v3/repos/o/r",
            200,
            json!({"default_branch": "trunk"}),
        );
        let api = GitHubApi::new(transport).with_api_base("https://ghe.example.com/api/v3/");

        let branch = api.resolve_ref(&parse_target("o/r").unwrap()).await.unwrap();
        assert_eq!(branch, "trunk");
    }
}

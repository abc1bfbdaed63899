// src/main.rs
// =============================================================================
// Entry point of the repo-indexer CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so stdout only carries Markdown/JSON)
// 3. Parse the target, resolve its ref, traverse, format
// 4. Exit with proper code (0 = success, 1 = indexing error, 2 = unexpected error)
//
// The pipeline is: parse_target -> resolve_ref -> traverse -> format_tree.
// =============================================================================

mod cli;
mod config;
mod github;
mod markdown;
mod traverse;

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::Config;
use github::transport::HttpTransport;
use github::{parse_target, ErrorCode, GitHubApi, IndexError, ResolvedTarget};
use traverse::{normalize_depth, traverse, FileNode};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = success
//   Ok(1) = the target could not be indexed (error already reported)
//   Err   = unexpected failure (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_cli(&cli);

    match cli.command {
        Commands::Index {
            target,
            max_depth,
            json,
            no_header,
        } => handle_index(&config, &target, max_depth, json, !no_header).await,
        Commands::Parse { target, json } => handle_parse(&target, json),
    }
}

fn init_tracing(verbose: bool) {
    // RUST_LOG wins; otherwise only warnings unless --verbose
    let default = if verbose { "repo_indexer=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// Handles the 'index' subcommand
async fn handle_index(
    config: &Config,
    input: &str,
    max_depth: f64,
    json: bool,
    with_header: bool,
) -> Result<i32> {
    let api = config.github_api()?;

    match index(&api, config, input, max_depth).await {
        Ok((target, nodes)) => {
            if json {
                let output = json!({ "nodes": nodes, "target": target });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let tree = markdown::format_tree(&nodes);
                let document = if with_header {
                    let header =
                        markdown::build_header(input, &target, normalize_depth(max_depth), &nodes);
                    markdown::render_document(&header, &tree)
                } else {
                    tree
                };
                println!("{document}");
            }
            Ok(0)
        }
        Err(err) => {
            report_error(&err, json)?;
            Ok(1)
        }
    }
}

// Parses, resolves and traverses under the configured deadline
//
// When the deadline passes the in-flight requests are dropped and only the
// timeout error is returned; a partial node list is never produced.
async fn index<T: HttpTransport>(
    api: &GitHubApi<T>,
    config: &Config,
    input: &str,
    max_depth: f64,
) -> Result<(ResolvedTarget, Vec<FileNode>), IndexError> {
    let parsed = parse_target(input)?;

    let work = async move {
        let target = if parsed.git_ref.is_some() {
            parsed.into_resolved()?
        } else {
            let git_ref = api.resolve_ref(&parsed).await?;
            parsed.resolve(git_ref)
        };
        info!(
            repo = %format!("{}/{}", target.owner, target.repo),
            git_ref = %target.git_ref,
            path = %target.path,
            "Indexing"
        );
        let nodes = traverse(api, &target, max_depth, config.walk_concurrency).await?;
        Ok::<_, IndexError>((target, nodes))
    };

    match tokio::time::timeout(config.traversal_timeout, work).await {
        Ok(result) => result,
        Err(_) => Err(IndexError::new(
            ErrorCode::Timeout,
            format!(
                "Indexing did not finish within {} seconds.",
                config.traversal_timeout.as_secs()
            ),
        )
        .with_status(504)),
    }
}

// Handles the 'parse' subcommand (no network access)
fn handle_parse(input: &str, json: bool) -> Result<i32> {
    match parse_target(input) {
        Ok(target) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&target)?);
            } else {
                println!("owner: {}", target.owner);
                println!("repo:  {}", target.repo);
                println!("kind:  {}", target.kind.as_str());
                println!("ref:   {}", target.git_ref.as_deref().unwrap_or("(default branch)"));
                println!("path:  {}", if target.path.is_empty() { "/" } else { target.path.as_str() });
            }
            Ok(0)
        }
        Err(err) => {
            report_error(&err, json)?;
            Ok(1)
        }
    }
}

// Prints an IndexError either as a JSON envelope on stdout or as text on stderr
fn report_error(err: &IndexError, json: bool) -> Result<()> {
    if json {
        let output = json!({ "error": err, "httpStatus": err.http_status() });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    eprintln!("Error [{}]: {}", err.code, err.message);
    if let Some(seconds) = err.retry_after_seconds() {
        eprintln!("Retry after: {seconds}s");
    }
    if let Some(url) = err.details.as_ref().and_then(|d| d.documentation_url.as_deref()) {
        eprintln!("See: {url}");
    }
    if err.code == ErrorCode::RateLimit {
        eprintln!("Hint: set GITHUB_TOKEN (or pass --token) to raise your rate limits.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use github::transport::{HttpError, HttpRequest, HttpResponse, MockTransport};
    use std::time::Duration;

    // A GitHub that accepts the connection and never answers
    struct StalledTransport;

    #[async_trait]
    impl HttpTransport for StalledTransport {
        async fn get(&self, _request: HttpRequest) -> Result<HttpResponse, HttpError> {
            std::future::pending().await
        }
    }

    fn test_config() -> Config {
        Config {
            traversal_timeout: Duration::from_secs(5),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_index_resolves_default_branch_then_traverses() {
        let transport = MockTransport::new();
        transport.respond_json(
            "https://api.github.com/repos/octocat/Hello-World",
            200,
            json!({"default_branch": "master"}),
        );
        transport.respond_json(
            "https://api.github.com/repos/octocat/Hello-World/git/trees/master?recursive=1",
            200,
            json!({"tree": [{"path": "README", "type": "blob", "size": 13}], "truncated": false}),
        );
        let api = GitHubApi::new(transport.clone());

        let (target, nodes) = index(&api, &test_config(), "octocat/Hello-World", 0.0)
            .await
            .unwrap();

        assert_eq!(target.git_ref, "master");
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0]
            .url_raw
            .contains("raw.githubusercontent.com/octocat/Hello-World"));
        assert!(nodes[0].url_html.contains("github.com/octocat/Hello-World/blob"));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_index_rejects_bad_input_without_network() {
        let transport = MockTransport::new();
        let api = GitHubApi::new(transport.clone());

        let err = index(&api, &test_config(), "https://gitlab.com/a/b", 1.0)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidHost);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_index_propagates_gateway_errors_unchanged() {
        let transport = MockTransport::new();
        transport.respond(
            "https://api.github.com/repos/o/r",
            HttpResponse {
                status: 403,
                headers: vec![
                    ("x-ratelimit-remaining".to_string(), "0".to_string()),
                    ("retry-after".to_string(), "42".to_string()),
                ],
                body: br#"{"message":"API rate limit exceeded"}"#.to_vec(),
            },
        );
        let api = GitHubApi::new(transport);

        let err = index(&api, &test_config(), "o/r", 1.0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RateLimit);
        assert_eq!(err.retry_after_seconds(), Some(42));
        assert_eq!(err.http_status(), 403);
    }

    #[tokio::test]
    async fn test_index_deadline_returns_timeout_without_nodes() {
        let api = GitHubApi::new(StalledTransport);
        let config = Config {
            traversal_timeout: Duration::from_millis(20),
            ..Config::default()
        };

        let err = index(&api, &config, "octocat/Hello-World", 1.0)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(err.status, Some(504));
        assert_eq!(err.http_status(), 504);
    }
}

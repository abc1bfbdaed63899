// src/config.rs
// =============================================================================
// Runtime configuration.
//
// Precedence (highest to lowest):
// 1. CLI flags
// 2. Environment variables (GITHUB_TOKEN, GITHUB_API_URL), via clap's `env`
// 3. Built-in defaults below
// =============================================================================

use std::time::Duration;

use crate::cli::Cli;
use crate::github::transport::{HttpError, ReqwestTransport};
use crate::github::{GitHubApi, DEFAULT_API_BASE};

pub const DEFAULT_WALK_CONCURRENCY: usize = crate::traverse::DEFAULT_WALK_CONCURRENCY;
pub const DEFAULT_TRAVERSAL_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub token: Option<String>,
    /// Timeout for a single GitHub request.
    pub request_timeout: Duration,
    /// Deadline for resolving the ref plus the whole traversal.
    pub traversal_timeout: Duration,
    pub walk_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            traversal_timeout: Duration::from_secs(DEFAULT_TRAVERSAL_TIMEOUT_SECS),
            walk_concurrency: DEFAULT_WALK_CONCURRENCY,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = Self::default();
        Self {
            api_base: cli.api_base.clone(),
            token: cli.token.clone().filter(|t| !t.trim().is_empty()),
            traversal_timeout: Duration::from_secs(cli.timeout.max(1)),
            walk_concurrency: cli.concurrency.max(1),
            ..defaults
        }
    }

    /// Builds the GitHub client with a reqwest transport.
    pub fn github_api(&self) -> Result<GitHubApi<ReqwestTransport>, HttpError> {
        let transport = ReqwestTransport::with_timeout(self.request_timeout)?;
        Ok(GitHubApi::new(transport)
            .with_api_base(self.api_base.clone())
            .with_token(self.token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli_overrides_defaults() {
        let cli = Cli::try_parse_from([
            "repo-indexer",
            "--token",
            "abc",
            "--timeout",
            "5",
            "--concurrency",
            "0",
            "parse",
            "o/r",
        ])
        .unwrap();
        let config = Config::from_cli(&cli);

        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.traversal_timeout, Duration::from_secs(5));
        assert_eq!(config.walk_concurrency, 1);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let cli = Cli::try_parse_from(["repo-indexer", "--token", "  ", "parse", "o/r"]).unwrap();
        assert_eq!(Config::from_cli(&cli).token, None);
    }
}

// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
//   repo-indexer index <TARGET> [--max-depth N] [--json] [--no-header]
//   repo-indexer parse <TARGET> [--json]
//
// Global options (--token, --api-base, --concurrency, --timeout, --verbose)
// can appear before or after the subcommand. --token and --api-base fall
// back to the GITHUB_TOKEN and GITHUB_API_URL environment variables.
// =============================================================================

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_TRAVERSAL_TIMEOUT_SECS, DEFAULT_WALK_CONCURRENCY};
use crate::github::DEFAULT_API_BASE;

#[derive(Parser, Debug)]
#[command(
    name = "repo-indexer",
    version,
    about = "Generate a Markdown index of raw file links for a GitHub repository",
    long_about = "repo-indexer lists the files and directories of a GitHub repository, directory or file \
                  (up to a chosen depth) and prints them as Markdown with raw.githubusercontent.com and \
                  github.com links for every file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// GitHub token sent as a bearer credential (raises rate limits, allows private repos)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Root of the GitHub REST API
    #[arg(long, global = true, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Directory listings fetched in parallel when the tree listing is truncated
    #[arg(long, global = true, default_value_t = DEFAULT_WALK_CONCURRENCY)]
    pub concurrency: usize,

    /// Give up on the whole traversal after this many seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TRAVERSAL_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Log GitHub requests and traversal decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a repository, directory (tree URL) or single file (blob URL)
    ///
    /// Example: repo-indexer index octocat/Hello-World --max-depth 2
    Index {
        /// GitHub URL, github.com/owner/repo, or owner/repo
        target: String,

        /// How many levels below the target to include (0 = direct children only)
        ///
        /// Fractions are rounded down; negative values count as 0.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        max_depth: f64,

        /// Print {"nodes": [...], "target": {...}} as JSON instead of Markdown
        #[arg(long)]
        json: bool,

        /// Print only the tree, without the summary header
        #[arg(long)]
        no_header: bool,
    },

    /// Show how a target is interpreted, without contacting GitHub
    ///
    /// Example: repo-indexer parse https://github.com/octocat/Hello-World/tree/main/src
    Parse {
        /// GitHub URL, github.com/owner/repo, or owner/repo
        target: String,

        /// Print the parsed target as JSON
        #[arg(long)]
        json: bool,
    },
}

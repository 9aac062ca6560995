//! CLI argument definitions using clap derive

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Syncache - optimistic data-sync cache for the emissions dashboard
///
/// Reads collections through a single-flight cache and applies post
/// edits optimistically against a simulated remote.
#[derive(Parser, Debug)]
#[command(name = "syncache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SYNCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the simulated remote failure rate (0.0 - 1.0)
    #[arg(long, global = true, value_parser = parse_rate)]
    pub failure_rate: Option<f64>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a collection through the cache
    Fetch(FetchArgs),

    /// Create, update or delete posts optimistically
    Posts(PostsArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Collection to fetch
    pub collection: Collection,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Collections served by the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    Countries,
    Companies,
    Posts,
}

/// Arguments for the posts command
#[derive(Parser, Debug)]
pub struct PostsArgs {
    /// Subcommand for posts
    #[command(subcommand)]
    pub action: PostsAction,
}

/// Posts subcommands
#[derive(Subcommand, Debug)]
pub enum PostsAction {
    /// Create a post, or update one when --id is given
    Upsert(UpsertArgs),

    /// Delete a post
    Delete {
        /// Post id
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for posts upsert
#[derive(Parser, Debug)]
pub struct UpsertArgs {
    /// Existing post id to update
    #[arg(long)]
    pub id: Option<String>,

    /// Post title
    #[arg(long)]
    pub title: String,

    /// Company id the post is about
    #[arg(long)]
    pub company: String,

    /// Month in YYYY-MM form
    #[arg(long, value_parser = parse_month)]
    pub month: String,

    /// Post body
    #[arg(long, default_value = "")]
    pub content: String,

    /// Author name
    #[arg(long, default_value = "")]
    pub author: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., remote.failure_rate)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one id per line)
    Plain,
}

/// Parse a probability in [0, 1]
pub(crate) fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s
        .parse()
        .map_err(|_| format!("invalid number: '{s}'"))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(format!("must be between 0 and 1, got {rate}"));
    }
    Ok(rate)
}

/// Parse a `YYYY-MM` month
fn parse_month(s: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM, got '{s}'"))?;
    if s.len() != 7 {
        return Err(format!("expected YYYY-MM, got '{s}'"));
    }
    Ok(s.to_string())
}

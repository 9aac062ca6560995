//! Syncache CLI entry point
//!
//! Loads configuration, initialises logging and dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use syncache::cli::{Cli, Commands};
use syncache::client::DashboardClient;
use syncache::config::{Config, ConfigManager};
use syncache::error::SyncacheResult;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// Single-threaded so subscriber notifications and spinner output interleave
// in program order.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> SyncacheResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    debug!("Using config at {}", config_manager.path().display());

    syncache::ui::init_theme();

    match cli.command {
        Commands::Fetch(args) => {
            let client = build_client(&config, cli.failure_rate);
            syncache::cli::commands::fetch(args, &client).await
        }
        Commands::Posts(args) => {
            let client = build_client(&config, cli.failure_rate);
            syncache::cli::commands::posts(args, &client).await
        }
        Commands::Config(args) => {
            syncache::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// Client over a fresh simulated remote; `--failure-rate` is not persisted
fn build_client(config: &Config, failure_rate: Option<f64>) -> DashboardClient {
    let mut config = config.clone();
    if let Some(rate) = failure_rate {
        debug!("Failure rate overridden to {}", rate);
        config.remote.failure_rate = rate;
    }
    DashboardClient::from_config(&config)
}

/// 0 = warn, 1 = info, 2+ = debug; `general.verbose` counts as one level
fn init_logging(verbose: u8, config: &Config) {
    let level = verbose.max(u8::from(config.general.verbose));
    let filter = match level {
        0 => EnvFilter::new("syncache=warn"),
        1 => EnvFilter::new("syncache=info"),
        _ => EnvFilter::new("syncache=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

//! chainscrape CLI — run and control the adaptive index scraper.
//!
//! Usage:
//! ```bash
//! # Scrape mainnet, idling near the head
//! chainscrape run --chain mainnet --rpc-url http://localhost:8545 \
//!     --staging-dir ~/.local/share/trueblocks/unchained/mainnet/staging
//!
//! # Pause / resume a running scraper
//! kill -USR1 <pid>
//! kill -USR2 <pid>
//!
//! # Show built-in defaults
//! chainscrape info
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use chainscrape_core::config::{
    DEFAULT_SLEEP_SECS, DEFAULT_UNRIPE_DISTANCE, FALLBACK_DISTANCE, MIN_CLOSE_ENOUGH_SLEEP_SECS,
};
use chainscrape_core::guard::TEST_END_SCRAPE_VAR;
use chainscrape_core::{CompletionSignal, PollLoop, ScraperBuilder, ScraperState};
use chainscrape_node::{HttpHeadClient, NodeProgressEstimator, ProcessDispatcher, StagingFolder};

mod controller;
mod logging;
mod settings;

use settings::ScrapeSettings;

#[derive(Parser)]
#[command(
    name = "chainscrape",
    about = "Adaptive polling scraper for a blockchain index worker",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scraper loop until stopped
    Run(RunArgs),
    /// Show the built-in backoff defaults
    Info,
    /// Print version
    Version,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// TOML file with the same settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Chain to scrape
    #[arg(long, env = "CHAINSCRAPE_CHAIN")]
    chain: Option<String>,
    /// JSON-RPC endpoint of the chain's node
    #[arg(long, env = "CHAINSCRAPE_RPC_URL")]
    rpc_url: Option<String>,
    /// Per-request RPC timeout in seconds
    #[arg(long)]
    rpc_timeout_secs: Option<u64>,
    /// Folder where the worker writes staged chunks
    #[arg(long, env = "CHAINSCRAPE_STAGING_DIR")]
    staging_dir: Option<PathBuf>,
    /// Seconds to idle between work units
    #[arg(long)]
    sleep: Option<u64>,
    /// Blocks near the head considered unripe
    #[arg(long)]
    unripe_dist: Option<u64>,
    /// Program run for each work unit
    #[arg(long, env = "CHAINSCRAPE_WORKER_BIN")]
    worker_bin: Option<PathBuf>,
    /// Arguments passed to the worker
    #[arg(long, allow_hyphen_values = true)]
    cmd_line: Option<String>,
    /// `KEY=VALUE` pairs for the worker, separated by `;`
    #[arg(long = "env")]
    worker_env: Option<String>,
    /// Log level (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args).await,
        Commands::Info => {
            cmd_info();
            Ok(())
        }
        Commands::Version => {
            println!("{}", version_line());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn cmd_run(args: RunArgs) -> Result<()> {
    let settings = ScrapeSettings::resolve(&args)?;
    logging::init_tracing(&settings.log)?;

    let (config, work) = ScraperBuilder::from_config(settings.poll.clone())
        .work_name(settings.worker_bin.display().to_string())
        .command_line(settings.command_line.clone())
        .environment(settings.environment.clone())
        .build();

    // validated in ScrapeSettings::resolve
    let rpc_url = settings.rpc_url.clone().unwrap_or_default();
    let staging_dir = settings.staging_dir.clone().unwrap_or_default();

    let client = HttpHeadClient::new(rpc_url, Duration::from_secs(settings.rpc_timeout_secs))?;
    let estimator =
        NodeProgressEstimator::new(config.chain.clone(), client, StagingFolder::new(staging_dir));
    let dispatcher = ProcessDispatcher::new(settings.worker_bin.clone());

    let state = Arc::new(ScraperState::new());
    let controller = controller::spawn_signal_controller(state.clone())?;

    let (signal, waiter) = CompletionSignal::new();
    let mut poll = PollLoop::new(config, work, state, estimator, dispatcher);
    let mut loop_task = tokio::spawn(async move { poll.run(signal).await });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl-C received; stopping scraper");
            loop_task.abort();
        }
        joined = &mut loop_task => {
            if let Err(e) = joined {
                tracing::error!(error = %e, "scraper task failed");
            }
        }
    }

    let exit = waiter.wait().await;
    tracing::info!(reason = ?exit.reason, iterations = exit.iterations, "index scraper stopped");
    controller.abort();
    Ok(())
}

fn version_line() -> String {
    format!("chainscrape v{}", env!("CARGO_PKG_VERSION"))
}

fn cmd_info() {
    println!("{}", version_line());
    println!("  Default sleep: {DEFAULT_SLEEP_SECS}s");
    println!("  Minimum sleep near head: {MIN_CLOSE_ENOUGH_SLEEP_SECS}s");
    println!("  Default unripe distance: {DEFAULT_UNRIPE_DISTANCE} blocks");
    println!("  Close enough to head: distance <= 2 x unripe distance");
    println!("  Distance assumed when the node errors: {FALLBACK_DISTANCE} blocks");
    println!("  Test early exit: set {TEST_END_SCRAPE_VAR}=<block>");
    println!("  Pause / resume: SIGUSR1 / SIGUSR2");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_subcommand_parses() {
        let cli = Cli::try_parse_from(["chainscrape", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
        assert_eq!(
            version_line(),
            format!("chainscrape v{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn info_and_run_still_parse() {
        assert!(matches!(
            Cli::try_parse_from(["chainscrape", "info"]).unwrap().command,
            Commands::Info
        ));
        assert!(matches!(
            Cli::try_parse_from(["chainscrape", "run", "--sleep", "30"])
                .unwrap()
                .command,
            Commands::Run(_)
        ));
    }
}

//! TruthMarket daemon: runs the lifecycle sweeper over an in-memory market.

mod config;
mod scheduler;
mod shutdown;

use anyhow::Context;
use clap::Parser;
use config::DaemonConfig;
use shutdown::ShutdownController;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use truthmarket_crypto::canonical_claim_hash;
use truthmarket_settlement::JournalSettlement;
use truthmarket_store::MemoryStore;
use truthmarket_types::{ClaimDraft, Timestamp, VerifierId};
use truthmarket_utils::{format_duration, init_logging, LogFormat};
use truthmarket_verification::{OperatorPolicy, TruthMarket};

#[derive(Parser)]
#[command(name = "truthmarket-daemon", about = "TruthMarket claim verification daemon")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "TRUTHMARKET_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TRUTHMARKET_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TRUTHMARKET_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Seconds between lifecycle sweeps.
    #[arg(long, env = "TRUTHMARKET_SWEEP_INTERVAL")]
    sweep_interval_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the market and sweep claim deadlines until SIGINT/SIGTERM.
    Run,
    /// Print the canonical hash of a JSON claim draft.
    CanonicalHash { file: PathBuf },
    /// Print the effective configuration as TOML.
    ShowConfig,
}

fn load_config(cli: &Cli) -> anyhow::Result<DaemonConfig> {
    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DaemonConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(secs) = cli.sweep_interval_secs {
        config.sweep_interval_secs = secs;
    }
    anyhow::ensure!(config.sweep_interval_secs > 0, "sweep_interval_secs must be positive");
    Ok(config)
}

async fn run(config: DaemonConfig) -> anyhow::Result<()> {
    init_logging(config.log_format, &config.log_level)?;

    let policy = Arc::new(OperatorPolicy::new(
        config.operators.iter().map(VerifierId::new),
    ));
    let market = Arc::new(TruthMarket::with_policy(
        Arc::new(MemoryStore::new()),
        Arc::new(JournalSettlement::new()),
        policy,
        config.params.clone(),
    ));

    let m = &config.params.market;
    tracing::info!(
        sweep_every = %format_duration(config.sweep_interval_secs),
        commit_window = %format_duration(m.commit_window_secs),
        reveal_window = %format_duration(m.reveal_window_secs),
        dispute_window = %format_duration(m.dispute_window_secs),
        min_quorum = m.min_quorum,
        operators = config.operators.len(),
        "starting TruthMarket daemon"
    );

    let controller = ShutdownController::new();
    let sweeper = tokio::spawn(scheduler::run_sweeper(
        Arc::clone(&market),
        Duration::from_secs(config.sweep_interval_secs),
        Timestamp::now,
        controller.subscribe(),
    ));

    controller.wait_for_signal().await;
    let totals = sweeper.await.context("sweeper task panicked")?;
    tracing::info!(sweeps = totals.sweeps, events = totals.events, "daemon exited cleanly");
    Ok(())
}

fn canonical_hash(file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let draft: ClaimDraft = serde_json::from_str(&raw).context("parsing claim draft")?;
    println!("{}", canonical_claim_hash(&draft).to_hex());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Run => run(config).await,
        Command::CanonicalHash { file } => canonical_hash(file),
        Command::ShowConfig => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

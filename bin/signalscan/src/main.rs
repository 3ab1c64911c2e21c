mod scan;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::Config;
use strategy::{EngineFileConfig, Evaluator, StrategyRegistry};

#[derive(Parser, Debug)]
#[command(name = "signalscan", about = "Evaluate trading signals for a batch of stock snapshots")]
struct Cli {
    /// JSON file holding an array of analysis requests
    requests: PathBuf,
    /// Engine config file (overrides ENGINE_CONFIG_PATH)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    // stdout carries the JSON report, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().context("invalid environment configuration")?;
    let engine_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(&cfg.engine_config_path));
    let engine_cfg = EngineFileConfig::load_or_default(&engine_path)
        .with_context(|| format!("failed to load engine config at '{}'", engine_path.display()))?;

    // ── Strategy registry ─────────────────────────────────────────────────────
    let registry = Arc::new(StrategyRegistry::builtin());
    info!(strategies = registry.len(), "Strategy registry ready");
    let evaluator = Evaluator::new(registry)
        .with_scoring(engine_cfg.scoring)
        .with_min_history_bars(cfg.min_history_bars);
    info!(
        min_score = evaluator.scoring().min_score,
        min_margin = evaluator.scoring().min_margin,
        min_history_bars = cfg.min_history_bars,
        default_conditions = engine_cfg.conditions.len(),
        "Engine config loaded"
    );

    // ── Requests ──────────────────────────────────────────────────────────────
    // Elements are decoded one by one in the scan so a malformed entry only
    // fails itself.
    let raw = std::fs::read_to_string(&cli.requests)
        .with_context(|| format!("failed to read requests at '{}'", cli.requests.display()))?;
    let requests: Vec<Value> =
        serde_json::from_str(&raw).context("requests file is not a JSON array")?;

    // ── Scan ──────────────────────────────────────────────────────────────────
    let outcomes = scan::run(evaluator, requests, &engine_cfg.conditions, cfg.scan_workers).await;

    let report = if cli.pretty {
        serde_json::to_string_pretty(&outcomes)?
    } else {
        serde_json::to_string(&outcomes)?
    };
    println!("{report}");
    Ok(())
}

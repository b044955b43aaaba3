//! Franchise Pulse - trailer sentiment and performance scoring per franchise
//!
//! Reads every franchise in the data directory, scores trailer comment
//! sentiment and financial performance, joins both per movie and writes the
//! rows as JSONL.
//!
//! Module structure:
//! - `domain/` - Core types (MovieRecord, CommentSet, Score, DataIssue)
//! - `io/` - Data boundary (franchise CSV, comment JSON) and egress
//! - `services/` - Sentiment, performance, joiner, chart series
//! - `infra/` - Infrastructure (Config, RunStats)

use anyhow::Context;
use clap::Parser;
use franchise_pulse::infra::{Config, RunStats};
use franchise_pulse::io::{load_inputs, Egress};
use franchise_pulse::services::Pipeline;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Franchise Pulse - score movie franchises by trailer sentiment and box office
#[derive(Parser, Debug)]
#[command(name = "franchise-pulse", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Data directory, overrides [data] dir
    #[arg(long)]
    data_dir: Option<String>,

    /// Only score this franchise (display name or file stem)
    #[arg(short, long)]
    franchise: Option<String>,

    /// Output JSONL file, overrides [egress] file
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Default: INFO, use RUST_LOG=debug for per-comment visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(version = %env!("CARGO_PKG_VERSION"), git_hash = %env!("GIT_HASH"), "franchise-pulse starting");

    let args = Args::parse();

    let mut config = Config::load_from_path(&args.config);
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(franchise) = args.franchise {
        config = config.with_franchise(franchise);
    }
    if let Some(output) = args.output {
        config = config.with_egress_file(output);
    }

    info!(
        config_file = %config.config_file(),
        data_dir = %config.data_dir(),
        franchise = ?config.franchise(),
        aggregation = %config.sentiment_aggregation().as_str(),
        max_comments = %config.max_comments(),
        weights = ?config.weights().active().collect::<Vec<_>>(),
        egress_file = %config.egress_file(),
        "config_loaded"
    );

    let inputs = load_inputs(config.data_dir(), config.franchise())?;
    let snapshot = Pipeline::from_config(&config).run(inputs);

    let mut stats = RunStats::new();
    for report in &snapshot.reports {
        stats.record_report(report);
    }

    let egress = Egress::new(config.egress_file());
    let written = egress
        .write_snapshot(&snapshot)
        .with_context(|| format!("Egress failed for run {}", snapshot.run_id))?;
    info!(run_id = %snapshot.run_id, rows = written, "snapshot_written");

    stats.summary().log();
    info!("franchise-pulse done");
    Ok(())
}

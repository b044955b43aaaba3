//! Franchise chart series
//!
//! Scores one franchise and prints the chart series of the chosen metric as
//! JSON on stdout, ready for a plotting front end.
//!
//! Usage:
//!   cargo run --bin franchise-chart -- --franchise "Star Wars"
//!   cargo run --bin franchise-chart -- -f alien --metric sentiment --no-smoothing

use anyhow::Context;
use clap::Parser;
use franchise_pulse::infra::Config;
use franchise_pulse::io::load_inputs;
use franchise_pulse::services::{chart_series, ChartMetric, ChartOptions, Pipeline};
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "franchise-chart", version)]
#[command(about = "Print the sentiment or performance chart series of one franchise")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Data directory, overrides [data] dir
    #[arg(long)]
    data_dir: Option<String>,

    /// Franchise to chart (display name or file stem), overrides [data] franchise
    #[arg(short, long)]
    franchise: Option<String>,

    /// performance | sentiment
    #[arg(short, long, default_value = "performance")]
    metric: ChartMetric,

    /// Draw straight segments instead of a spline
    #[arg(long)]
    no_smoothing: bool,

    /// Spline sample count, overrides [chart] points
    #[arg(long)]
    points: Option<usize>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(version = %env!("CARGO_PKG_VERSION"), git_hash = %env!("GIT_HASH"), "franchise-chart starting");

    let mut config = Config::load_from_path(&args.config);
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(franchise) = args.franchise {
        config = config.with_franchise(franchise);
    }
    let franchise = config
        .franchise()
        .context("No franchise selected, pass --franchise or set [data] franchise")?
        .to_string();

    let inputs = load_inputs(config.data_dir(), Some(&franchise))?;
    let snapshot = Pipeline::from_config(&config).run(inputs);
    let report = snapshot
        .franchise(&franchise)
        .with_context(|| format!("Franchise '{}' could not be loaded", franchise))?;

    let options = ChartOptions {
        smoothing: config.chart_smoothing() && !args.no_smoothing,
        samples: args.points.unwrap_or(config.chart_points()),
    };
    let series = chart_series(report, args.metric, options);
    info!(
        franchise = %series.franchise,
        metric = %series.metric.as_str(),
        points = series.points.len(),
        gaps = series.gaps.len(),
        smoothed = series.smoothed,
        "chart_series_built"
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&series)?
    } else {
        serde_json::to_string(&series)?
    };
    println!("{}", json);
    Ok(())
}

//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use crate::domain::types::{Aggregation, Metric};
use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding `<name>_movies.csv` and `<name>_comments.json` files
    #[serde(default = "default_data_dir")]
    pub dir: String,
    /// Restrict the run to one franchise (display name or file stem)
    #[serde(default)]
    pub franchise: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { dir: default_data_dir(), franchise: None }
    }
}

fn default_data_dir() -> String {
    "csvs".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentimentConfig {
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default = "default_max_comments")]
    pub max_comments: usize,
    /// Extra VADER-format lexicon merged over the built-in one
    #[serde(default)]
    pub lexicon_path: Option<String>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            aggregation: Aggregation::default(),
            max_comments: default_max_comments(),
            lexicon_path: None,
        }
    }
}

fn default_max_comments() -> usize {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceConfig {
    /// Per-metric weights keyed by metric name ("profit", "roi", "box_office")
    #[serde(default = "default_weight_table")]
    pub weights: HashMap<String, f64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self { weights: default_weight_table() }
    }
}

fn default_weight_table() -> HashMap<String, f64> {
    HashMap::from([
        ("profit".to_string(), 1.0),
        ("roi".to_string(), 1.0),
        ("box_office".to_string(), 0.0),
    ])
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_smoothing")]
    pub smoothing: bool,
    #[serde(default = "default_chart_points")]
    pub points: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { smoothing: default_smoothing(), points: default_chart_points() }
    }
}

fn default_smoothing() -> bool {
    true
}

fn default_chart_points() -> usize {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct EgressConfig {
    /// File path for joined score rows (JSONL format)
    #[serde(default = "default_egress_file")]
    pub file: String,
}

impl Default for EgressConfig {
    fn default() -> Self {
        Self { file: default_egress_file() }
    }
}

fn default_egress_file() -> String {
    "scores.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub egress: EgressConfig,
}

/// Per-metric weights for the composite performance score
///
/// Metrics absent from the table have weight 0 and are not computed.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricWeights(FxHashMap<Metric, f64>);

impl MetricWeights {
    pub fn new(weights: impl IntoIterator<Item = (Metric, f64)>) -> Self {
        Self(weights.into_iter().collect())
    }

    /// Equal weight on profit and ROI
    pub fn equal() -> Self {
        Self::new([(Metric::Profit, 1.0), (Metric::Roi, 1.0)])
    }

    /// Build from a name-keyed table, skipping unknown names and non-finite weights
    pub fn from_table(table: &HashMap<String, f64>) -> Self {
        let mut weights = FxHashMap::default();
        for (name, &weight) in table {
            match name.parse::<Metric>() {
                Ok(metric) if weight.is_finite() => {
                    weights.insert(metric, weight);
                }
                Ok(metric) => {
                    warn!(metric = %metric.as_str(), weight = %weight, "non_finite_weight_ignored");
                }
                Err(e) => {
                    warn!(error = %e, "unknown_metric_weight_ignored");
                }
            }
        }
        Self(weights)
    }

    pub fn weight(&self, metric: Metric) -> f64 {
        self.0.get(&metric).copied().unwrap_or(0.0)
    }

    /// Metrics with a nonzero weight, in canonical order
    pub fn active(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(|m| (m, self.weight(m))).filter(|(_, w)| *w != 0.0)
    }
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self::equal()
    }
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    config_file: String,
    data_dir: String,
    franchise: Option<String>,
    sentiment_aggregation: Aggregation,
    max_comments: usize,
    lexicon_path: Option<String>,
    weights: MetricWeights,
    chart_smoothing: bool,
    chart_points: usize,
    egress_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            config_file,
            data_dir: toml_config.data.dir,
            franchise: toml_config.data.franchise,
            sentiment_aggregation: toml_config.sentiment.aggregation,
            max_comments: toml_config.sentiment.max_comments,
            lexicon_path: toml_config.sentiment.lexicon_path,
            weights: MetricWeights::from_table(&toml_config.performance.weights),
            chart_smoothing: toml_config.chart.smoothing,
            chart_points: toml_config.chart.points,
            egress_file: toml_config.egress.file,
        }
    }

    /// Determine config file path from args or environment
    pub fn resolve_config_path(args: &[String]) -> String {
        for (i, arg) in args.iter().enumerate() {
            if arg == "--config" {
                if let Some(path) = args.get(i + 1) {
                    return path.clone();
                }
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            }
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration - resolves the path from args, falls back to defaults
    pub fn load(args: &[String]) -> Self {
        Self::load_from_path(&Self::resolve_config_path(args))
    }

    /// Load configuration from a path, falling back to defaults on any error
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "config_load_failed_using_defaults");
                Self::default()
            }
        }
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn data_dir(&self) -> &str {
        &self.data_dir
    }

    pub fn franchise(&self) -> Option<&str> {
        self.franchise.as_deref()
    }

    pub fn sentiment_aggregation(&self) -> Aggregation {
        self.sentiment_aggregation
    }

    pub fn max_comments(&self) -> usize {
        self.max_comments
    }

    pub fn lexicon_path(&self) -> Option<&str> {
        self.lexicon_path.as_deref()
    }

    pub fn weights(&self) -> &MetricWeights {
        &self.weights
    }

    pub fn chart_smoothing(&self) -> bool {
        self.chart_smoothing
    }

    pub fn chart_points(&self) -> usize {
        self.chart_points
    }

    pub fn egress_file(&self) -> &str {
        &self.egress_file
    }

    /// Override the data directory (CLI flag)
    pub fn with_data_dir(mut self, dir: impl Into<String>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Override the franchise filter (CLI flag)
    pub fn with_franchise(mut self, franchise: impl Into<String>) -> Self {
        self.franchise = Some(franchise.into());
        self
    }

    /// Override the egress file (CLI flag)
    pub fn with_egress_file(mut self, file: impl Into<String>) -> Self {
        self.egress_file = file.into();
        self
    }

    /// Builder method for tests to set the sentiment statistic
    #[cfg(test)]
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.sentiment_aggregation = aggregation;
        self
    }
}

//! Services - scoring pipelines and presentation shaping
//!
//! - `sentiment` - Comment polarity model and per-trailer aggregation
//! - `performance` - Franchise-relative performance coefficients
//! - `joiner` - Per-movie rows with explicit missing-data markers
//! - `pipeline` - Runs both pipelines per franchise, builds the run snapshot
//! - `chart` - Render-ready time series for one franchise and metric

pub mod chart;
pub mod joiner;
pub mod performance;
pub mod pipeline;
pub mod sentiment;

pub use chart::{chart_series, ChartMetric, ChartOptions, ChartSeries};
pub use joiner::{join_scores, PerformanceCell, ScoreRow, SentimentCell};
pub use performance::{PerformanceNormalizer, PerformanceOutcome};
pub use pipeline::{FranchiseInput, FranchiseReport, Pipeline, Snapshot};
pub use sentiment::{SentimentAggregator, SentimentOutcome};

//! Infrastructure - configuration and run statistics
//!
//! - `config` - Application configuration (TOML loading, defaults)
//! - `metrics` - Per-run counters and the summary log line

pub mod config;
pub mod metrics;

pub use config::{Config, MetricWeights};
pub use metrics::{RunStats, RunSummary};

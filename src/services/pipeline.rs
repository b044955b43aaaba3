//! Franchise pipeline and session snapshot
//!
//! Runs sentiment aggregation and performance normalization over fully loaded
//! inputs and joins them into a `FranchiseReport`. A `Snapshot` bundles the
//! reports of one run; it is immutable and passed explicitly to whatever
//! renders or writes it.

use crate::domain::comment::CommentSet;
use crate::domain::issue::{Insufficient, IssueRecord};
use crate::domain::movie::FranchiseSeries;
use crate::domain::types::FranchiseId;
use crate::infra::config::Config;
use crate::services::joiner::{join_scores, ScoreRow};
use crate::services::performance::{MetricStats, PerformanceNormalizer};
use crate::services::sentiment::SentimentAggregator;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Joined results for one franchise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FranchiseReport {
    pub franchise: FranchiseId,
    pub name: String,
    pub rows: Vec<ScoreRow>,
    pub metric_stats: Vec<MetricStats>,
    pub issues: Vec<IssueRecord>,
}

/// Inputs of one franchise as delivered by the data boundary
#[derive(Debug, Clone)]
pub struct FranchiseInput {
    pub series: FranchiseSeries,
    pub comments: CommentSet,
    /// Issues already recovered while loading
    pub issues: Vec<IssueRecord>,
}

/// Sentiment aggregator and performance normalizer configured for a run
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    aggregator: SentimentAggregator,
    normalizer: PerformanceNormalizer,
}

impl Pipeline {
    pub fn new(aggregator: SentimentAggregator, normalizer: PerformanceNormalizer) -> Self {
        Self { aggregator, normalizer }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            SentimentAggregator::from_config(config),
            PerformanceNormalizer::new(config.weights().clone()),
        )
    }

    /// Score and join one franchise; comments are consumed
    pub fn run_franchise(&self, input: FranchiseInput) -> FranchiseReport {
        let FranchiseInput { series, mut comments, mut issues } = input;

        if !comments.is_available() {
            issues.push(IssueRecord::general(Insufficient::SourceUnavailable));
        }

        let mut sentiments = Vec::with_capacity(series.len());
        for movie in series.movies() {
            let trailer = self.aggregator.aggregate(&movie.id, comments.take(&movie.id));
            issues.extend(trailer.issues.iter().cloned());
            sentiments.push(trailer);
        }
        for orphan in comments.remaining_movies() {
            warn!(franchise = %series.id, movie = %orphan, "comments_without_movie_ignored");
        }

        let performance = self.normalizer.normalize(&series);
        issues.extend(performance.issues.iter().cloned());

        let rows = join_scores(&series, &sentiments, &performance);
        info!(
            franchise = %series.id,
            movies = rows.len(),
            sentiment_scored = rows.iter().filter(|r| r.sentiment.score().is_some()).count(),
            performance_scored = rows.iter().filter(|r| r.performance.score().is_some()).count(),
            issues = issues.len(),
            "franchise_scored"
        );

        FranchiseReport {
            franchise: series.id.clone(),
            name: series.name.clone(),
            rows,
            metric_stats: performance.metric_stats,
            issues,
        }
    }

    /// Run every franchise and bundle the reports
    pub fn run(&self, inputs: Vec<FranchiseInput>) -> Snapshot {
        let reports = inputs.into_iter().map(|input| self.run_franchise(input)).collect();
        Snapshot::new(reports)
    }
}

/// Immutable results of one run
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub reports: Vec<FranchiseReport>,
}

impl Snapshot {
    pub fn new(reports: Vec<FranchiseReport>) -> Self {
        Self { run_id: Uuid::now_v7().to_string(), generated_at: Utc::now(), reports }
    }

    /// Find a franchise by id or display name (case-insensitive)
    pub fn franchise(&self, key: &str) -> Option<&FranchiseReport> {
        self.reports.iter().find(|r| {
            r.franchise.as_str().eq_ignore_ascii_case(key) || r.name.eq_ignore_ascii_case(key)
        })
    }

    pub fn franchise_names(&self) -> Vec<&str> {
        self.reports.iter().map(|r| r.name.as_str()).collect()
    }
}

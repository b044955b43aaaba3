//! Run statistics collected while building a snapshot
//!
//! Counters are plain integers: the pipelines run on one thread and the stats
//! are folded in from finished reports, never from inside the pure stages.

use crate::domain::issue::{DataIssue, IssueRecord};
use crate::services::joiner::{PerformanceCell, SentimentCell};
use crate::services::pipeline::FranchiseReport;
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Accumulated counters for one run
#[derive(Debug)]
pub struct RunStats {
    started_at: Instant,
    franchises: u64,
    movies: u64,
    comments_scored: u64,
    comments_skipped: u64,
    sentiment_scored: u64,
    sentiment_missing: u64,
    performance_scored: u64,
    performance_flagged: u64,
    issues_insufficient: u64,
    issues_malformed: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            franchises: 0,
            movies: 0,
            comments_scored: 0,
            comments_skipped: 0,
            sentiment_scored: 0,
            sentiment_missing: 0,
            performance_scored: 0,
            performance_flagged: 0,
            issues_insufficient: 0,
            issues_malformed: 0,
        }
    }

    /// Fold one franchise report into the counters
    pub fn record_report(&mut self, report: &FranchiseReport) {
        self.franchises += 1;
        for row in &report.rows {
            self.movies += 1;
            match &row.sentiment {
                SentimentCell::Scored(s) => {
                    self.sentiment_scored += 1;
                    self.comments_scored += s.comments_used as u64;
                    self.comments_skipped += s.comments_skipped as u64;
                }
                SentimentCell::NoData { comments_skipped } => {
                    self.sentiment_missing += 1;
                    self.comments_skipped += *comments_skipped as u64;
                }
            }
            match &row.performance {
                PerformanceCell::Scored { .. } => self.performance_scored += 1,
                PerformanceCell::InsufficientData { .. } => self.performance_flagged += 1,
            }
        }
        self.record_issues(&report.issues);
    }

    pub fn record_issues(&mut self, issues: &[IssueRecord]) {
        for record in issues {
            match record.issue {
                DataIssue::Insufficient(_) => self.issues_insufficient += 1,
                DataIssue::Malformed(_) => self.issues_malformed += 1,
            }
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            elapsed_ms: self.started_at.elapsed().as_millis() as u64,
            franchises: self.franchises,
            movies: self.movies,
            comments_scored: self.comments_scored,
            comments_skipped: self.comments_skipped,
            sentiment_scored: self.sentiment_scored,
            sentiment_missing: self.sentiment_missing,
            performance_scored: self.performance_scored,
            performance_flagged: self.performance_flagged,
            issues_insufficient: self.issues_insufficient,
            issues_malformed: self.issues_malformed,
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the run counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub elapsed_ms: u64,
    pub franchises: u64,
    pub movies: u64,
    pub comments_scored: u64,
    pub comments_skipped: u64,
    pub sentiment_scored: u64,
    pub sentiment_missing: u64,
    pub performance_scored: u64,
    pub performance_flagged: u64,
    pub issues_insufficient: u64,
    pub issues_malformed: u64,
}

impl RunSummary {
    pub fn log(&self) {
        info!(
            elapsed_ms = %self.elapsed_ms,
            franchises = %self.franchises,
            movies = %self.movies,
            comments_scored = %self.comments_scored,
            comments_skipped = %self.comments_skipped,
            sentiment_scored = %self.sentiment_scored,
            sentiment_missing = %self.sentiment_missing,
            performance_scored = %self.performance_scored,
            performance_flagged = %self.performance_flagged,
            issues_insufficient = %self.issues_insufficient,
            issues_malformed = %self.issues_malformed,
            "run_summary"
        );
    }
}

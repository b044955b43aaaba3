//! Score joiner - one presentation row per movie
//!
//! Sentiment and performance results are matched by movie id onto the
//! franchise's release-date order. A missing result becomes an explicit marker
//! so that charts can render a gap instead of a zero.

use crate::domain::movie::{FranchiseSeries, MovieExtras};
use crate::domain::types::{FranchiseId, MovieId, Score};
use crate::services::performance::{FranchisePerformance, PerformanceOutcome};
use crate::services::sentiment::{SentimentOutcome, TrailerSentiment};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

/// Sentiment column of a row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SentimentCell {
    Scored(SentimentSummary),
    NoData { comments_skipped: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub score: Score,
    pub comments_used: usize,
    pub comments_skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Why a movie has no performance coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientReason {
    FranchiseSize,
    FinancialData,
}

/// Performance column of a row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PerformanceCell {
    Scored { score: Score, composite: f64 },
    InsufficientData { reason: InsufficientReason },
}

impl SentimentCell {
    pub fn score(&self) -> Option<Score> {
        match self {
            SentimentCell::Scored(s) => Some(s.score),
            SentimentCell::NoData { .. } => None,
        }
    }
}

impl PerformanceCell {
    pub fn score(&self) -> Option<Score> {
        match self {
            PerformanceCell::Scored { score, .. } => Some(*score),
            PerformanceCell::InsufficientData { .. } => None,
        }
    }
}

impl From<&SentimentOutcome> for SentimentCell {
    fn from(outcome: &SentimentOutcome) -> Self {
        match outcome {
            SentimentOutcome::Scored(s) => SentimentCell::Scored(SentimentSummary {
                score: s.score,
                comments_used: s.comments_used,
                comments_skipped: s.comments_skipped,
                comment: s.representative_comment.clone(),
            }),
            SentimentOutcome::NoData { comments_skipped } => {
                SentimentCell::NoData { comments_skipped: *comments_skipped }
            }
        }
    }
}

impl From<&PerformanceOutcome> for PerformanceCell {
    fn from(outcome: &PerformanceOutcome) -> Self {
        match outcome {
            PerformanceOutcome::Scored(c) => {
                PerformanceCell::Scored { score: c.score, composite: c.composite }
            }
            PerformanceOutcome::InsufficientFranchiseSize { .. } => {
                PerformanceCell::InsufficientData { reason: InsufficientReason::FranchiseSize }
            }
            PerformanceOutcome::InsufficientFinancialData => {
                PerformanceCell::InsufficientData { reason: InsufficientReason::FinancialData }
            }
        }
    }
}

/// One movie, ready for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub franchise: FranchiseId,
    pub movie: MovieId,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub production_budget: Option<f64>,
    pub box_office: Option<f64>,
    pub profit: Option<f64>,
    pub roi_percentage: Option<f64>,
    pub sentiment: SentimentCell,
    pub performance: PerformanceCell,
    #[serde(flatten)]
    pub extras: MovieExtras,
}

/// Join results onto the franchise's movies, in release-date order
///
/// `sentiments` and `performance` are matched to movies by position (the
/// franchise order both pipelines iterate in), so movies sharing an id can
/// never pick up each other's results. An entry whose id does not match the
/// movie at its position is logged and treated as missing.
pub fn join_scores(
    series: &FranchiseSeries,
    sentiments: &[TrailerSentiment],
    performance: &FranchisePerformance,
) -> Vec<ScoreRow> {
    let rows: Vec<ScoreRow> = series
        .movies()
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let sentiment = match sentiments.get(i) {
                Some(s) if s.movie == movie.id => SentimentCell::from(&s.outcome),
                Some(s) => {
                    warn!(franchise = %series.id, movie = %movie.id, found = %s.movie, "sentiment_misaligned");
                    SentimentCell::NoData { comments_skipped: 0 }
                }
                None => SentimentCell::NoData { comments_skipped: 0 },
            };
            let performance = performance
                .at(i, &movie.id)
                .map(PerformanceCell::from)
                .unwrap_or(PerformanceCell::InsufficientData {
                    reason: InsufficientReason::FinancialData,
                });
            ScoreRow {
                franchise: series.id.clone(),
                movie: movie.id.clone(),
                title: movie.title.clone(),
                release_date: movie.release_date,
                production_budget: movie.budget,
                box_office: movie.box_office,
                profit: movie.profit(),
                roi_percentage: movie.roi_percentage(),
                sentiment,
                performance,
                extras: movie.extras.clone(),
            }
        })
        .collect();

    for extra in sentiments.iter().skip(rows.len()) {
        warn!(franchise = %series.id, movie = %extra.movie, "sentiment_without_movie_dropped");
    }

    rows
}

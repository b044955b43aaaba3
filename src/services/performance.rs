//! Performance coefficient normalizer
//!
//! Within one franchise, each weighted financial metric is turned into a
//! z-score (population standard deviation), the weighted z-scores of a movie
//! are summed into a composite, and the composite is squashed through a
//! logistic sigmoid into the [0, 1] coefficient.
//!
//! A franchise is the only meaningful comparison group: coefficients of two
//! franchises are not comparable with each other.

use crate::domain::issue::{Insufficient, IssueRecord};
use crate::domain::movie::FranchiseSeries;
use crate::domain::types::{Metric, MovieId, Score};
use crate::infra::config::MetricWeights;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, info};

/// Relative spread below which a metric is treated as constant
const ZERO_VARIANCE_TOLERANCE: f64 = 1e-9;

/// Logistic sigmoid mapping (-inf, inf) onto (0, 1)
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Population statistics of one metric across a franchise
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricStats {
    pub metric: Metric,
    pub samples: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl MetricStats {
    /// Mean and population standard deviation; None with fewer than 2 values
    pub fn compute(metric: Metric, values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self { metric, samples: values.len(), mean, std_dev: variance.sqrt() })
    }

    /// True when the metric carries no discriminating signal
    pub fn is_constant(&self) -> bool {
        self.std_dev <= ZERO_VARIANCE_TOLERANCE * self.mean.abs().max(1.0)
    }

    /// z-score of `value`; 0 for a constant metric
    pub fn z_score(&self, value: f64) -> f64 {
        if self.is_constant() {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }
}

/// One metric's contribution to a movie's composite
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricContribution {
    pub metric: Metric,
    pub value: f64,
    pub z: f64,
    pub weight: f64,
}

/// Normalized financial score of one movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceCoefficient {
    pub movie: MovieId,
    pub score: Score,
    /// Weighted z-score sum before the sigmoid
    pub composite: f64,
    pub contributions: SmallVec<[MetricContribution; 3]>,
}

/// Coefficient or the reason none could be computed
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceOutcome {
    Scored(PerformanceCoefficient),
    InsufficientFranchiseSize { size: usize },
    InsufficientFinancialData,
}

impl PerformanceOutcome {
    pub fn score(&self) -> Option<Score> {
        match self {
            PerformanceOutcome::Scored(c) => Some(c.score),
            _ => None,
        }
    }
}

/// Per-movie outcome, in franchise order
#[derive(Debug, Clone, PartialEq)]
pub struct MoviePerformance {
    pub movie: MovieId,
    pub outcome: PerformanceOutcome,
}

/// Normalizer output for a whole franchise
#[derive(Debug, Clone, PartialEq)]
pub struct FranchisePerformance {
    pub movies: Vec<MoviePerformance>,
    pub metric_stats: Vec<MetricStats>,
    pub issues: Vec<IssueRecord>,
}

impl FranchisePerformance {
    /// Outcome of the movie at `index` in franchise order, if its id matches
    pub fn at(&self, index: usize, movie: &MovieId) -> Option<&PerformanceOutcome> {
        self.movies.get(index).filter(|m| &m.movie == movie).map(|m| &m.outcome)
    }
}

/// Computes franchise-relative performance coefficients
#[derive(Debug, Clone, Default)]
pub struct PerformanceNormalizer {
    weights: MetricWeights,
}

impl PerformanceNormalizer {
    pub fn new(weights: MetricWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &MetricWeights {
        &self.weights
    }

    /// Normalize one franchise
    pub fn normalize(&self, series: &FranchiseSeries) -> FranchisePerformance {
        let movies = series.movies();
        let mut issues = Vec::new();

        if movies.len() < 2 {
            info!(franchise = %series.id, size = movies.len(), "franchise_too_small");
            issues.push(IssueRecord::general(Insufficient::FranchiseSize { size: movies.len() }));
            let flagged = movies
                .iter()
                .map(|m| MoviePerformance {
                    movie: m.id.clone(),
                    outcome: PerformanceOutcome::InsufficientFranchiseSize { size: movies.len() },
                })
                .collect();
            return FranchisePerformance { movies: flagged, metric_stats: Vec::new(), issues };
        }

        let mut contributions: Vec<SmallVec<[MetricContribution; 3]>> =
            vec![SmallVec::new(); movies.len()];
        let mut metric_stats = Vec::new();

        for (metric, weight) in self.weights.active() {
            let defined: Vec<(usize, f64)> = movies
                .iter()
                .enumerate()
                .filter_map(|(i, m)| m.metric(metric).map(|v| (i, v)))
                .collect();
            let values: Vec<f64> = defined.iter().map(|(_, v)| *v).collect();

            let Some(stats) = MetricStats::compute(metric, &values) else {
                debug!(
                    franchise = %series.id,
                    metric = %metric.as_str(),
                    samples = values.len(),
                    "metric_excluded"
                );
                issues.push(IssueRecord::general(Insufficient::MetricSamples {
                    metric,
                    count: values.len(),
                }));
                continue;
            };

            if stats.is_constant() {
                debug!(franchise = %series.id, metric = %metric.as_str(), "metric_zero_variance");
            }

            for (i, value) in defined {
                contributions[i].push(MetricContribution {
                    metric,
                    value,
                    z: stats.z_score(value),
                    weight,
                });
            }
            metric_stats.push(stats);
        }

        let results = movies
            .iter()
            .zip(contributions)
            .map(|(movie, contributions)| {
                if contributions.is_empty() {
                    debug!(movie = %movie.id, "insufficient_financial_data");
                    issues.push(IssueRecord::for_movie(movie.id.clone(), Insufficient::Financials));
                    return MoviePerformance {
                        movie: movie.id.clone(),
                        outcome: PerformanceOutcome::InsufficientFinancialData,
                    };
                }
                let composite: f64 = contributions.iter().map(|c| c.weight * c.z).sum();
                let score = Score::from_unit(sigmoid(composite));
                debug!(movie = %movie.id, composite = %composite, score = %score, "performance_scored");
                MoviePerformance {
                    movie: movie.id.clone(),
                    outcome: PerformanceOutcome::Scored(PerformanceCoefficient {
                        movie: movie.id.clone(),
                        score,
                        composite,
                        contributions,
                    }),
                }
            })
            .collect();

        FranchisePerformance { movies: results, metric_stats, issues }
    }
}

//! Chart series builder
//!
//! Pure function from a franchise report and a chosen metric to the points a
//! time-series chart needs: the raw markers, a line (natural cubic spline
//! through the markers when there are at least three distinct dates), and the
//! movies that have to be drawn as gaps.

use crate::domain::types::{FranchiseId, MovieId};
use crate::services::joiner::{PerformanceCell, ScoreRow, SentimentCell};
use crate::services::pipeline::FranchiseReport;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Minimum number of distinct dates for spline smoothing
const MIN_SPLINE_POINTS: usize = 3;

/// Score plotted on the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMetric {
    Performance,
    Sentiment,
}

impl ChartMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartMetric::Performance => "performance",
            ChartMetric::Sentiment => "sentiment",
        }
    }

    fn value(&self, row: &ScoreRow) -> Result<f64, &'static str> {
        match self {
            ChartMetric::Performance => match &row.performance {
                PerformanceCell::Scored { score, .. } => Ok(score.value()),
                PerformanceCell::InsufficientData { .. } => Err("insufficient_data"),
            },
            ChartMetric::Sentiment => match &row.sentiment {
                SentimentCell::Scored(s) => Ok(s.score.value()),
                SentimentCell::NoData { .. } => Err("no_data"),
            },
        }
    }
}

impl std::str::FromStr for ChartMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "performance" => Ok(ChartMetric::Performance),
            "sentiment" => Ok(ChartMetric::Sentiment),
            other => Err(format!("unknown chart metric '{}'", other)),
        }
    }
}

/// A scored movie on the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub movie: MovieId,
    pub title: String,
    pub date: NaiveDate,
    pub value: f64,
}

/// One vertex of the drawn line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A movie that cannot be placed on the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGap {
    pub movie: MovieId,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub reason: &'static str,
}

/// Render-ready series for one franchise and metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub franchise: FranchiseId,
    pub name: String,
    pub metric: ChartMetric,
    pub smoothed: bool,
    pub points: Vec<ChartPoint>,
    pub line: Vec<LinePoint>,
    pub gaps: Vec<ChartGap>,
}

/// Line rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub smoothing: bool,
    pub samples: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self { smoothing: true, samples: 300 }
    }
}

/// Build the chart series of `metric` for one franchise
pub fn chart_series(report: &FranchiseReport, metric: ChartMetric, options: ChartOptions) -> ChartSeries {
    let mut points = Vec::new();
    let mut gaps = Vec::new();

    for row in &report.rows {
        match (row.release_date, metric.value(row)) {
            (Some(date), Ok(value)) => points.push(ChartPoint {
                movie: row.movie.clone(),
                title: row.title.clone(),
                date,
                value,
            }),
            (None, _) => gaps.push(ChartGap {
                movie: row.movie.clone(),
                title: row.title.clone(),
                release_date: None,
                reason: "no_release_date",
            }),
            (Some(date), Err(reason)) => gaps.push(ChartGap {
                movie: row.movie.clone(),
                title: row.title.clone(),
                release_date: Some(date),
                reason,
            }),
        }
    }

    let knots = distinct_date_knots(&points);
    let spline = if options.smoothing && options.samples >= 2 && knots.len() >= MIN_SPLINE_POINTS {
        let (xs, ys): (Vec<f64>, Vec<f64>) = knots.iter().copied().unzip();
        NaturalCubicSpline::fit(&xs, &ys)
    } else {
        None
    };

    let (smoothed, line) = match spline {
        Some(spline) => (true, sample_spline(&spline, options.samples)),
        None => (false, points.iter().map(|p| LinePoint { date: p.date, value: p.value }).collect()),
    };

    ChartSeries {
        franchise: report.franchise.clone(),
        name: report.name.clone(),
        metric,
        smoothed,
        points,
        line,
        gaps,
    }
}

/// (day number, mean value) per distinct date, ascending
fn distinct_date_knots(points: &[ChartPoint]) -> Vec<(f64, f64)> {
    let mut sorted: Vec<(i32, f64)> =
        points.iter().map(|p| (p.date.num_days_from_ce(), p.value)).collect();
    sorted.sort_by_key(|(day, _)| *day);

    let mut knots: Vec<(f64, f64)> = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let day = sorted[i].0;
        let mut j = i;
        let mut sum = 0.0;
        while j < sorted.len() && sorted[j].0 == day {
            sum += sorted[j].1;
            j += 1;
        }
        knots.push((day as f64, sum / (j - i) as f64));
        i = j;
    }
    knots
}

/// Up to `samples` evenly spaced days across the spline's domain
///
/// Samples land on whole days, so a span shorter than `samples` days yields
/// one point per day rather than repeated dates.
fn sample_spline(spline: &NaturalCubicSpline, samples: usize) -> Vec<LinePoint> {
    let (start, end) = spline.domain();
    let step = (end - start) / (samples - 1) as f64;
    let mut line: Vec<LinePoint> = Vec::with_capacity(samples);
    for k in 0..samples {
        let x = if k == samples - 1 { end } else { (start + step * k as f64).round() };
        let Some(date) = NaiveDate::from_num_days_from_ce_opt(x as i32) else {
            continue;
        };
        if line.last().is_some_and(|p| p.date == date) {
            continue;
        }
        line.push(LinePoint { date, value: spline.eval(x).clamp(0.0, 1.0) });
    }
    line
}

/// Natural cubic spline (zero second derivative at both ends)
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalCubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second: Vec<f64>,
}

impl NaturalCubicSpline {
    /// Fit through knots with strictly increasing `xs`; None otherwise
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len();
        if n < 2 || ys.len() != n || xs.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }

        let mut second = vec![0.0; n];
        if n > 2 {
            // Thomas algorithm on the interior equations
            let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
            let interior = n - 2;
            let mut diag = vec![0.0; interior];
            let mut rhs = vec![0.0; interior];
            for k in 0..interior {
                let i = k + 1;
                diag[k] = 2.0 * (h[i - 1] + h[i]);
                rhs[k] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
            }
            for k in 1..interior {
                let factor = h[k] / diag[k - 1];
                diag[k] -= factor * h[k];
                rhs[k] -= factor * rhs[k - 1];
            }
            for k in (0..interior).rev() {
                let upper = if k + 1 < interior { h[k + 1] * second[k + 2] } else { 0.0 };
                second[k + 1] = (rhs[k] - upper) / diag[k];
            }
        }

        Some(Self { xs: xs.to_vec(), ys: ys.to_vec(), second })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Evaluate at `x`, clamped to the fitted domain
    pub fn eval(&self, x: f64) -> f64 {
        let (start, end) = self.domain();
        let x = x.clamp(start, end);
        let i = match self.xs.partition_point(|&knot| knot <= x) {
            0 => 0,
            p if p >= self.xs.len() => self.xs.len() - 2,
            p => p - 1,
        };
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a.powi(3) - a) * self.second[i] + (b.powi(3) - b) * self.second[i + 1]) * h * h / 6.0
    }
}

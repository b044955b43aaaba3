//! Shared types for franchise analysis

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Newtype wrapper for movie identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive an identifier from a title: lowercase ASCII alphanumerics joined by '-'
    pub fn from_title(title: &str) -> Self {
        let mut slug = String::with_capacity(title.len());
        for ch in title.chars() {
            if ch.is_alphanumeric() {
                slug.extend(ch.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        Self(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Newtype wrapper for franchise identifiers (the normalization group)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FranchiseId(pub String);

impl FranchiseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FranchiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of decimals a score is rendered with
pub const SCORE_DECIMALS: i32 = 2;

/// A score bounded to [0, 1]
///
/// The value is kept at full precision so scores stay strictly ordered;
/// rounding to `SCORE_DECIMALS` happens only when rendered (`Display`,
/// `Serialize`). A value strictly inside (0, 1) never renders as 0.00 or 1.00.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Score(f64);

impl Score {
    /// Clamp `value` into [0, 1]. NaN maps to 0.
    pub fn from_unit(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Map a compound polarity in [-1, 1] onto the unit range via `(c + 1) / 2`
    pub fn from_polarity(compound: f64) -> Self {
        Self::from_unit((compound + 1.0) / 2.0)
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Value rounded to `SCORE_DECIMALS`, interior values kept off the bounds
    pub fn rounded(&self) -> f64 {
        let factor = 10f64.powi(SCORE_DECIMALS);
        let rounded = (self.0 * factor).round() / factor;
        if self.0 > 0.0 && self.0 < 1.0 {
            rounded.clamp(1.0 / factor, (factor - 1.0) / factor)
        } else {
            rounded
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.rounded())
    }
}

/// Map a compound polarity in [-1, 1] onto [0, 1] without rounding
#[inline]
pub fn polarity_to_unit(compound: f64) -> f64 {
    ((compound + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Financial metrics available to the performance normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Profit,
    Roi,
    BoxOffice,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Profit, Metric::Roi, Metric::BoxOffice];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Profit => "profit",
            Metric::Roi => "roi",
            Metric::BoxOffice => "box_office",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profit" => Ok(Metric::Profit),
            "roi" => Ok(Metric::Roi),
            "box_office" => Ok(Metric::BoxOffice),
            other => Err(format!("unknown metric '{}'", other)),
        }
    }
}

/// Statistic used to collapse per-comment scores into one trailer score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Mean,
    Median,
}

impl Aggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Median => "median",
        }
    }
}

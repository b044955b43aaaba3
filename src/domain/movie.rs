//! Movie records and the franchise series they are normalized within

use crate::domain::types::{FranchiseId, Metric, MovieId};
use chrono::NaiveDate;
use serde::Serialize;

/// Presentation fields passed through untouched to the joined rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MovieExtras {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
}

/// One movie's metadata and financials
///
/// Budget and gross are `None` when the source had no usable figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub franchise: FranchiseId,
    pub release_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub box_office: Option<f64>,
    #[serde(flatten)]
    pub extras: MovieExtras,
}

impl MovieRecord {
    pub fn new(
        id: MovieId,
        title: impl Into<String>,
        franchise: FranchiseId,
        release_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            franchise,
            release_date,
            budget: None,
            box_office: None,
            extras: MovieExtras::default(),
        }
    }

    pub fn with_financials(mut self, budget: Option<f64>, box_office: Option<f64>) -> Self {
        self.budget = budget;
        self.box_office = box_office;
        self
    }

    pub fn with_extras(mut self, extras: MovieExtras) -> Self {
        self.extras = extras;
        self
    }

    /// gross - budget, when both are known
    pub fn profit(&self) -> Option<f64> {
        Some(self.box_office? - self.budget?)
    }

    /// profit / budget; undefined when budget <= 0
    pub fn roi(&self) -> Option<f64> {
        let budget = self.budget?;
        if budget <= 0.0 {
            return None;
        }
        Some(self.profit()? / budget)
    }

    /// ROI expressed in percent, rounded to two decimals
    pub fn roi_percentage(&self) -> Option<f64> {
        self.roi().map(|roi| (roi * 10_000.0).round() / 100.0)
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        let value = match metric {
            Metric::Profit => self.profit(),
            Metric::Roi => self.roi(),
            Metric::BoxOffice => self.box_office,
        }?;
        value.is_finite().then_some(value)
    }
}

/// Movies of one franchise, ordered by release date
///
/// Undated movies sort after dated ones; ties keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FranchiseSeries {
    pub id: FranchiseId,
    pub name: String,
    movies: Vec<MovieRecord>,
}

impl FranchiseSeries {
    pub fn new(id: FranchiseId, name: impl Into<String>, mut movies: Vec<MovieRecord>) -> Self {
        movies.sort_by_key(|m| (m.release_date.is_none(), m.release_date));
        Self { id, name: name.into(), movies }
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, id: &MovieId) -> Option<&MovieRecord> {
        self.movies.iter().find(|m| &m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, date: Option<(i32, u32, u32)>, budget: Option<f64>, gross: Option<f64>) -> MovieRecord {
        let date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        MovieRecord::new(MovieId::new(id), id, FranchiseId::new("f"), date)
            .with_financials(budget, gross)
    }

    #[test]
    fn test_profit_and_roi() {
        let m = movie("a", None, Some(100.0), Some(350.0));
        assert_eq!(m.profit(), Some(250.0));
        assert_eq!(m.roi(), Some(2.5));
        assert_eq!(m.roi_percentage(), Some(250.0));
    }

    #[test]
    fn test_roi_undefined_for_non_positive_budget() {
        let zero = movie("a", None, Some(0.0), Some(10.0));
        assert_eq!(zero.profit(), Some(10.0));
        assert_eq!(zero.roi(), None);

        let negative = movie("b", None, Some(-5.0), Some(10.0));
        assert_eq!(negative.roi(), None);
    }

    #[test]
    fn test_missing_financials() {
        let m = movie("a", None, None, Some(10.0));
        assert_eq!(m.profit(), None);
        assert_eq!(m.roi(), None);
        assert_eq!(m.metric(Metric::BoxOffice), Some(10.0));
    }

    #[test]
    fn test_series_sorted_by_release_date_undated_last() {
        let series = FranchiseSeries::new(
            FranchiseId::new("f"),
            "F",
            vec![
                movie("undated", None, None, None),
                movie("late", Some((2012, 5, 4)), None, None),
                movie("early", Some((2008, 5, 2)), None, None),
            ],
        );
        let ids: Vec<&str> = series.movies().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", "undated"]);
        assert!(series.get(&MovieId::new("late")).is_some());
        assert!(series.get(&MovieId::new("missing")).is_none());
    }
}

//! Data issue taxonomy
//!
//! Issues are recovered at the smallest scope (one comment, one movie) and
//! carried as values next to the results. None of them aborts a franchise.

use crate::domain::types::{Metric, MovieId};
use serde::Serialize;
use thiserror::Error;

/// Too little data to compute a result
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Insufficient {
    #[error("no usable comments")]
    NoComments,
    #[error("franchise has {size} movie(s), at least 2 are required")]
    FranchiseSize { size: usize },
    #[error("no financial metric could be computed")]
    Financials,
    #[error("metric {metric:?} is defined for {count} movie(s), at least 2 are required")]
    MetricSamples { metric: Metric, count: usize },
    #[error("no data available from source")]
    SourceUnavailable,
}

/// Input that could not be interpreted
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Malformed {
    #[error("comment has no readable text")]
    CommentText,
    #[error("field {field} is not numeric: '{raw}'")]
    NonNumeric { field: &'static str, raw: String },
    #[error("release date '{raw}' could not be parsed")]
    ReleaseDate { raw: String },
    #[error("row could not be decoded: {detail}")]
    Row { detail: String },
    #[error("movie id '{id}' is used more than once")]
    DuplicateId { id: String },
}

/// A recovered data problem
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    #[error("insufficient data: {0}")]
    Insufficient(Insufficient),
    #[error("malformed data: {0}")]
    Malformed(Malformed),
}

impl DataIssue {
    pub fn kind(&self) -> &'static str {
        match self {
            DataIssue::Insufficient(_) => "insufficient",
            DataIssue::Malformed(_) => "malformed",
        }
    }
}

impl From<Insufficient> for DataIssue {
    fn from(value: Insufficient) -> Self {
        DataIssue::Insufficient(value)
    }
}

impl From<Malformed> for DataIssue {
    fn from(value: Malformed) -> Self {
        DataIssue::Malformed(value)
    }
}

/// An issue attributed to a movie, or to the whole input when `movie` is None
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie: Option<MovieId>,
    pub issue: DataIssue,
}

impl IssueRecord {
    pub fn for_movie(movie: MovieId, issue: impl Into<DataIssue>) -> Self {
        Self { movie: Some(movie), issue: issue.into() }
    }

    pub fn general(issue: impl Into<DataIssue>) -> Self {
        Self { movie: None, issue: issue.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue: DataIssue = Insufficient::FranchiseSize { size: 1 }.into();
        assert_eq!(
            issue.to_string(),
            "insufficient data: franchise has 1 movie(s), at least 2 are required"
        );
        assert_eq!(issue.kind(), "insufficient");

        let issue: DataIssue =
            Malformed::NonNumeric { field: "box_office", raw: "TBD".to_string() }.into();
        assert_eq!(issue.kind(), "malformed");
        assert!(issue.to_string().contains("'TBD'"));
    }

    #[test]
    fn test_issue_record_serializes_tagged() {
        let record = IssueRecord::for_movie(MovieId::new("m1"), Malformed::CommentText);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["movie"], "m1");
        assert_eq!(json["issue"]["kind"], "malformed");
        assert_eq!(json["issue"]["reason"], "comment_text");
    }
}

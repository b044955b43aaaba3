//! Comment sentiment pipeline
//!
//! Scores each comment of a trailer with the rule-based analyzer, maps the
//! compound polarity onto [0, 1] and collapses the per-comment values into one
//! trailer score with the configured statistic.
//!
//! - `lexicon` - valence, booster and negation vocabularies
//! - `analyzer` - per-comment compound polarity
//! - `text` - markup stripping and readability check

pub mod analyzer;
pub mod lexicon;
pub mod text;

use crate::domain::issue::{Insufficient, IssueRecord};
use crate::domain::types::{polarity_to_unit, Aggregation, MovieId, Score};
use crate::infra::config::Config;
use serde::Serialize;
use tracing::{debug, warn};

pub use analyzer::{Polarity, SentimentAnalyzer};
pub use lexicon::Lexicon;

/// Aggregate sentiment of one trailer's comments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentScore {
    pub movie: MovieId,
    pub score: Score,
    pub aggregation: Aggregation,
    pub comments_used: usize,
    pub comments_skipped: usize,
    /// Comment whose own score sits closest to the aggregate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative_comment: Option<String>,
}

/// Result of aggregating one trailer: a score or an explicit "no data"
#[derive(Debug, Clone, PartialEq)]
pub enum SentimentOutcome {
    Scored(SentimentScore),
    NoData { comments_skipped: usize },
}

impl SentimentOutcome {
    pub fn score(&self) -> Option<Score> {
        match self {
            SentimentOutcome::Scored(s) => Some(s.score),
            SentimentOutcome::NoData { .. } => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, SentimentOutcome::NoData { .. })
    }
}

/// Outcome for one trailer plus the issues recovered on the way
#[derive(Debug, Clone, PartialEq)]
pub struct TrailerSentiment {
    pub movie: MovieId,
    pub outcome: SentimentOutcome,
    pub issues: Vec<IssueRecord>,
}

/// Collapse mapped per-comment scores with `aggregation`; None when empty
pub fn aggregate_values(values: &[f64], aggregation: Aggregation) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    match aggregation {
        Aggregation::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
        Aggregation::Median => {
            let mut sorted = values.to_vec();
            sorted.sort_by(f64::total_cmp);
            let mid = sorted.len() / 2;
            if sorted.len() % 2 == 0 {
                Some((sorted[mid - 1] + sorted[mid]) / 2.0)
            } else {
                Some(sorted[mid])
            }
        }
    }
}

/// Turns trailer comment lists into sentiment scores
#[derive(Debug, Clone)]
pub struct SentimentAggregator {
    analyzer: SentimentAnalyzer,
    aggregation: Aggregation,
    max_comments: usize,
}

impl SentimentAggregator {
    pub fn new(analyzer: SentimentAnalyzer, aggregation: Aggregation, max_comments: usize) -> Self {
        Self { analyzer, aggregation, max_comments }
    }

    /// Build from config; an unreadable lexicon file falls back to the built-in lexicon
    pub fn from_config(config: &Config) -> Self {
        let lexicon = match config.lexicon_path() {
            Some(path) => Lexicon::builtin_with_file(path).unwrap_or_else(|e| {
                warn!(path = %path, error = %format!("{:#}", e), "lexicon_file_ignored");
                Lexicon::builtin()
            }),
            None => Lexicon::builtin(),
        };
        Self::new(SentimentAnalyzer::new(lexicon), config.sentiment_aggregation(), config.max_comments())
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    pub fn max_comments(&self) -> usize {
        self.max_comments
    }

    /// Score one trailer's comments
    ///
    /// Only the first `max_comments` comments are read. Unreadable comments
    /// are skipped and recorded; with no readable comment left the outcome is
    /// `NoData`, never a neutral 0.5.
    pub fn aggregate<I, S>(&self, movie: &MovieId, comments: I) -> TrailerSentiment
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut issues = Vec::new();
        let mut scored: Vec<(f64, String)> = Vec::new();
        let mut skipped = 0;
        let mut truncated = 0;

        for (i, comment) in comments.into_iter().enumerate() {
            if i >= self.max_comments {
                truncated += 1;
                continue;
            }
            match text::clean_comment(comment.as_ref()) {
                Ok(cleaned) => {
                    let polarity = self.analyzer.polarity(&cleaned);
                    scored.push((polarity_to_unit(polarity.compound), cleaned));
                }
                Err(malformed) => {
                    skipped += 1;
                    debug!(movie = %movie, index = i, "comment_skipped");
                    issues.push(IssueRecord::for_movie(movie.clone(), malformed));
                }
            }
        }

        if truncated > 0 {
            debug!(movie = %movie, ignored = truncated, max = self.max_comments, "comments_truncated");
        }

        let values: Vec<f64> = scored.iter().map(|(v, _)| *v).collect();
        let Some(aggregate) = aggregate_values(&values, self.aggregation) else {
            issues.push(IssueRecord::for_movie(movie.clone(), Insufficient::NoComments));
            debug!(movie = %movie, skipped = skipped, "sentiment_no_data");
            return TrailerSentiment {
                movie: movie.clone(),
                outcome: SentimentOutcome::NoData { comments_skipped: skipped },
                issues,
            };
        };

        let representative_comment = scored
            .iter()
            .min_by(|(a, _), (b, _)| (a - aggregate).abs().total_cmp(&(b - aggregate).abs()))
            .map(|(_, text)| text.clone());

        let score = SentimentScore {
            movie: movie.clone(),
            score: Score::from_unit(aggregate),
            aggregation: self.aggregation,
            comments_used: scored.len(),
            comments_skipped: skipped,
            representative_comment,
        };
        debug!(
            movie = %movie,
            score = %score.score,
            used = score.comments_used,
            skipped = skipped,
            "sentiment_scored"
        );

        TrailerSentiment { movie: movie.clone(), outcome: SentimentOutcome::Scored(score), issues }
    }
}

impl Default for SentimentAggregator {
    fn default() -> Self {
        Self::new(SentimentAnalyzer::default(), Aggregation::Mean, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::{DataIssue, Malformed};

    fn movie() -> MovieId {
        MovieId::new("m1")
    }

    #[test]
    fn test_empty_list_is_no_data() {
        let result = SentimentAggregator::default().aggregate(&movie(), Vec::<String>::new());
        assert_eq!(result.outcome, SentimentOutcome::NoData { comments_skipped: 0 });
        assert_eq!(result.outcome.score(), None);
        assert_eq!(
            result.issues,
            vec![IssueRecord::for_movie(movie(), Insufficient::NoComments)]
        );
    }

    #[test]
    fn test_opposite_comments_average_toward_middle() {
        let aggregator = SentimentAggregator::default();
        let analyzer = SentimentAnalyzer::default();
        let loved = polarity_to_unit(analyzer.polarity("I loved it!!").compound);
        let worst = polarity_to_unit(analyzer.polarity("Worst trailer ever").compound);
        assert!(loved > 0.5 && worst < 0.5);

        let result = aggregator.aggregate(&movie(), ["I loved it!!", "Worst trailer ever"]);
        let score = result.outcome.score().unwrap().value();
        assert!((score - 0.5).abs() < (loved - 0.5).abs());
        assert!((score - 0.5).abs() < (worst - 0.5).abs());
    }

    #[test]
    fn test_scores_stay_in_unit_range() {
        let aggregator = SentimentAggregator::default();
        let lists: [&[&str]; 4] = [
            &["BEST MOVIE EVER!!!! love love love"],
            &["worst worst worst, hate it, garbage"],
            &["meh", "ok I guess", "release date?"],
            &[":)", ":(", "no comment"],
        ];
        for list in lists {
            let score = aggregator.aggregate(&movie(), list).outcome.score().unwrap().value();
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn test_malformed_comments_skipped_not_fatal() {
        let result =
            SentimentAggregator::default().aggregate(&movie(), ["<br>", "", "great trailer"]);
        let SentimentOutcome::Scored(score) = &result.outcome else {
            panic!("expected a score");
        };
        assert_eq!(score.comments_used, 1);
        assert_eq!(score.comments_skipped, 2);
        assert_eq!(score.representative_comment.as_deref(), Some("great trailer"));
        let malformed = result
            .issues
            .iter()
            .filter(|r| r.issue == DataIssue::Malformed(Malformed::CommentText))
            .count();
        assert_eq!(malformed, 2);
    }

    #[test]
    fn test_all_malformed_is_no_data() {
        let result = SentimentAggregator::default().aggregate(&movie(), ["", "   "]);
        assert_eq!(result.outcome, SentimentOutcome::NoData { comments_skipped: 2 });
        assert!(result.outcome.is_no_data());
    }

    #[test]
    fn test_neutral_comments_score_half() {
        let result = SentimentAggregator::default().aggregate(&movie(), ["trailer drops friday"]);
        assert_eq!(result.outcome.score().unwrap().value(), 0.5);
    }

    #[test]
    fn test_max_comments_cap() {
        let aggregator = SentimentAggregator::new(SentimentAnalyzer::default(), Aggregation::Mean, 2);
        let result = aggregator.aggregate(&movie(), ["great", "great", "terrible", "terrible"]);
        let SentimentOutcome::Scored(score) = result.outcome else {
            panic!("expected a score");
        };
        assert_eq!(score.comments_used, 2);
        assert!(score.score.value() > 0.5);
    }

    #[test]
    fn test_aggregate_values_mean_and_median() {
        assert_eq!(aggregate_values(&[], Aggregation::Mean), None);
        assert_eq!(aggregate_values(&[0.25, 0.5, 0.75], Aggregation::Mean), Some(0.5));
        assert_eq!(aggregate_values(&[0.9, 0.2, 0.4], Aggregation::Median), Some(0.4));
        assert_eq!(aggregate_values(&[0.25, 1.0, 0.75, 0.5], Aggregation::Median), Some(0.625));
    }

    #[test]
    fn test_median_resists_outlier() {
        let aggregator =
            SentimentAggregator::new(SentimentAnalyzer::default(), Aggregation::Median, 100);
        let result = aggregator.aggregate(&movie(), ["great", "great", "worst disaster ever"]);
        assert!(result.outcome.score().unwrap().value() > 0.5);
    }
}

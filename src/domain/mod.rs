//! Domain models - movies, comments, scores and data issues
//!
//! - `types` - identifiers, the bounded `Score`, metric and aggregation enums
//! - `movie` - `MovieRecord` and the `FranchiseSeries` normalization group
//! - `comment` - raw trailer comments grouped per movie
//! - `issue` - the insufficient/malformed data taxonomy

pub mod comment;
pub mod issue;
pub mod movie;
pub mod types;

pub use comment::{CommentSet, TrailerComment};
pub use issue::{DataIssue, Insufficient, IssueRecord, Malformed};
pub use movie::{FranchiseSeries, MovieExtras, MovieRecord};
pub use types::{Aggregation, FranchiseId, Metric, MovieId, Score};

//! Trailer comment loader
//!
//! Comments are exported per franchise as `<name>_comments.json`: an object
//! mapping movie id to the list of top-level comment texts on its trailer.
//!
//! ```json
//! { "iron-man": ["Best trailer ever!", "meh"], "iron-man-2": [] }
//! ```
//!
//! A missing file, or one that is not a JSON object, means the source is
//! unavailable, which is distinct from a source that answered with no
//! comments. Bad entries inside a valid object only cost their own movie.

use crate::domain::comment::{CommentSet, TrailerComment};
use crate::domain::issue::{IssueRecord, Malformed};
use crate::domain::types::MovieId;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// File name suffix of franchise comment exports
pub const COMMENTS_SUFFIX: &str = "_comments.json";

/// Parse a comment export
///
/// Only a document that is not a JSON object fails as a whole. A movie entry
/// that is not a list, or a list item that is not a string, is recorded
/// against that movie and skipped.
pub fn parse_comments(json: &str) -> Result<(CommentSet, Vec<IssueRecord>), serde_json::Error> {
    let raw: BTreeMap<String, Value> = serde_json::from_str(json)?;
    let mut set = CommentSet::new();
    let mut issues = Vec::new();

    for (movie, entry) in raw {
        let movie = MovieId::new(movie);
        let entries = match entry {
            Value::Array(entries) => entries,
            other => {
                warn!(movie = %movie, value = %other, "comment_entry_not_a_list");
                issues.push(IssueRecord::for_movie(
                    movie.clone(),
                    Malformed::Row { detail: format!("comments for '{}' are not a list", movie) },
                ));
                continue;
            }
        };
        for entry in entries {
            match entry {
                Value::String(text) => set.push(TrailerComment::new(movie.clone(), text)),
                other => {
                    debug!(movie = %movie, value = %other, "non_text_comment_skipped");
                    issues.push(IssueRecord::for_movie(movie.clone(), Malformed::CommentText));
                }
            }
        }
    }

    Ok((set, issues))
}

/// Load a comment export; a missing or broken file yields an unavailable set
pub fn load_comments_file<P: AsRef<Path>>(path: P) -> (CommentSet, Vec<IssueRecord>) {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "comments_unavailable");
            return (CommentSet::unavailable(), Vec::new());
        }
    };

    match parse_comments(&content) {
        Ok((set, issues)) => {
            info!(file = %path.display(), comments = set.len(), "comments_loaded");
            (set, issues)
        }
        Err(e) => {
            warn!(file = %path.display(), error = %e, "comments_unparseable");
            let issue = IssueRecord::general(Malformed::Row {
                detail: format!("{}: {}", path.display(), e),
            });
            (CommentSet::unavailable(), vec![issue])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_comments_groups_by_movie() {
        let json = r#"{"a": ["good", 42, "bad"], "b": []}"#;
        let (mut set, issues) = parse_comments(json).unwrap();

        assert!(set.is_available());
        assert_eq!(set.len(), 2);
        assert_eq!(issues, vec![IssueRecord::for_movie(MovieId::new("a"), Malformed::CommentText)]);

        let a = set.take(&MovieId::new("a"));
        assert_eq!(a.iter().map(AsRef::as_ref).collect::<Vec<&str>>(), vec!["good", "bad"]);
        assert!(set.take(&MovieId::new("b")).is_empty());
    }

    #[test]
    fn test_bad_entry_keeps_other_movies() {
        let json = r#"{"a": ["great trailer"], "b": null, "c": "just text"}"#;
        let (mut set, issues) = parse_comments(json).unwrap();

        assert!(set.is_available());
        assert_eq!(set.len(), 1);
        assert_eq!(set.take(&MovieId::new("a")).len(), 1);
        let movies: Vec<&str> =
            issues.iter().filter_map(|r| r.movie.as_ref()).map(MovieId::as_str).collect();
        assert_eq!(movies, vec!["b", "c"]);
        assert!(issues.iter().all(|r| r.issue.kind() == "malformed"));
    }

    #[test]
    fn test_non_object_document_fails() {
        assert!(parse_comments(r#"["great trailer"]"#).is_err());
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempdir().unwrap();
        let (set, issues) = load_comments_file(dir.path().join("none_comments.json"));
        assert!(!set.is_available());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_broken_file_is_unavailable_with_issue() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x_comments.json");
        fs::write(&path, "[not json").unwrap();

        let (set, issues) = load_comments_file(&path);
        assert!(!set.is_available());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].movie.is_none());
    }

    #[test]
    fn test_empty_object_is_available() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x_comments.json");
        fs::write(&path, "{}").unwrap();

        let (set, issues) = load_comments_file(&path);
        assert!(set.is_available());
        assert!(set.is_empty());
        assert!(issues.is_empty());
    }
}

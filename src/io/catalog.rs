//! Data directory discovery
//!
//! Pairs every `<name>_movies.csv` with its `<name>_comments.json` and loads
//! both into a `FranchiseInput`.

use crate::io::comments::{load_comments_file, COMMENTS_SUFFIX};
use crate::io::franchise_csv::{franchise_from_stem, load_franchise_file, MOVIES_SUFFIX};
use crate::services::pipeline::FranchiseInput;
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Files of one franchise found in the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FranchiseFiles {
    pub stem: String,
    pub name: String,
    pub movies: PathBuf,
    pub comments: PathBuf,
}

impl FranchiseFiles {
    fn matches(&self, key: &str) -> bool {
        self.stem.eq_ignore_ascii_case(key) || self.name.eq_ignore_ascii_case(key)
    }
}

/// List franchises in `dir`, sorted by file stem
pub fn discover<P: AsRef<Path>>(dir: P) -> anyhow::Result<Vec<FranchiseFiles>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read data directory {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let Some(stem) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(MOVIES_SUFFIX))
        else {
            continue;
        };
        let stem = stem.to_string();
        let (_, name) = franchise_from_stem(&stem);
        let comments = dir.join(format!("{stem}{COMMENTS_SUFFIX}"));
        found.push(FranchiseFiles { name, movies: path, comments, stem });
    }
    found.sort_by(|a, b| a.stem.cmp(&b.stem));
    Ok(found)
}

/// Load one franchise; only an unreadable movie table is an error
pub fn load_input(files: &FranchiseFiles) -> anyhow::Result<FranchiseInput> {
    let (series, mut issues) = load_franchise_file(&files.movies)?;
    let (comments, comment_issues) = load_comments_file(&files.comments);
    issues.extend(comment_issues);
    Ok(FranchiseInput { series, comments, issues })
}

/// Load every franchise in `dir`, or only the one matching `filter`
///
/// A franchise whose movie table cannot be read is skipped with a warning.
/// An unmatched filter is an error naming the available franchises.
pub fn load_inputs<P: AsRef<Path>>(
    dir: P,
    filter: Option<&str>,
) -> anyhow::Result<Vec<FranchiseInput>> {
    let dir = dir.as_ref();
    let mut files = discover(dir)?;

    if let Some(key) = filter {
        let available: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        files.retain(|f| f.matches(key));
        if files.is_empty() {
            bail!("Unknown franchise '{}', available: {}", key, available.join(", "));
        }
    }

    info!(dir = %dir.display(), franchises = files.len(), "franchises_discovered");

    let mut inputs = Vec::with_capacity(files.len());
    for file in &files {
        match load_input(file) {
            Ok(input) => inputs.push(input),
            Err(e) => warn!(franchise = %file.stem, error = %format!("{:#}", e), "franchise_skipped"),
        }
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discover_pairs_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("star_wars_movies.csv"), "title\n").unwrap();
        fs::write(dir.path().join("alien_movies.csv"), "title\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = discover(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].stem, "alien");
        assert_eq!(files[1].name, "Star Wars");
        assert_eq!(files[1].comments, dir.path().join("star_wars_comments.json"));
    }

    #[test]
    fn test_unknown_filter_lists_available() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("alien_movies.csv"), "title\n").unwrap();

        let err = load_inputs(dir.path(), Some("Predator")).unwrap_err();
        assert!(err.to_string().contains("Alien"));
    }

    #[test]
    fn test_filter_matches_display_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("star_wars_movies.csv"), "title\n").unwrap();
        fs::write(dir.path().join("alien_movies.csv"), "title\n").unwrap();

        let inputs = load_inputs(dir.path(), Some("star wars")).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].series.name, "Star Wars");
        assert!(!inputs[0].comments.is_available());
    }

    #[test]
    fn test_missing_dir_is_error() {
        assert!(load_inputs("/nonexistent/franchise/data", None).is_err());
    }
}

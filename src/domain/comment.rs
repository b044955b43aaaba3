//! Trailer comments as handed over by the comment source

use crate::domain::types::MovieId;
use rustc_hash::FxHashMap;

/// One raw top-level comment on a movie's trailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailerComment {
    pub movie: MovieId,
    pub text: String,
}

impl TrailerComment {
    pub fn new(movie: MovieId, text: impl Into<String>) -> Self {
        Self { movie, text: text.into() }
    }
}

impl AsRef<str> for TrailerComment {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Comments of one franchise grouped by movie
///
/// `take` hands each movie's comments out by value so they are dropped as
/// soon as they are scored.
#[derive(Debug, Clone, Default)]
pub struct CommentSet {
    by_movie: FxHashMap<MovieId, Vec<TrailerComment>>,
    available: bool,
}

impl CommentSet {
    /// A set from a source that answered (possibly with zero comments)
    pub fn new() -> Self {
        Self { by_movie: FxHashMap::default(), available: true }
    }

    /// Marker for a source that could not be read at all
    pub fn unavailable() -> Self {
        Self { by_movie: FxHashMap::default(), available: false }
    }

    pub fn from_comments(comments: impl IntoIterator<Item = TrailerComment>) -> Self {
        let mut set = Self::new();
        for comment in comments {
            set.push(comment);
        }
        set
    }

    pub fn push(&mut self, comment: TrailerComment) {
        self.by_movie.entry(comment.movie.clone()).or_default().push(comment);
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Remove and return a movie's comments; empty when there are none
    pub fn take(&mut self, movie: &MovieId) -> Vec<TrailerComment> {
        self.by_movie.remove(movie).unwrap_or_default()
    }

    /// Movies that still have comments left
    pub fn remaining_movies(&self) -> impl Iterator<Item = &MovieId> {
        self.by_movie.keys()
    }

    pub fn len(&self) -> usize {
        self.by_movie.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

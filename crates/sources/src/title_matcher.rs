//! Title Matcher - fuzzy lookup of catalog titles
//!
//! Resolves a free-text query such as "the matriks" to catalog entries.
//!
//! ## Algorithm
//! 1. At construction, precompute the token-sort key of every catalog title
//! 2. Compute the token-sort key of the query
//! 3. Score every title against the query (see `fuzzy.rs`), in parallel
//! 4. Keep scores >= threshold
//! 5. Order by score desc, then title asc; cap at `limit` (default 10)

use crate::fuzzy;
use catalog::{Catalog, MovieId};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default minimum score for a title to count as a match
pub const DEFAULT_TITLE_THRESHOLD: u8 = 70;

/// One fuzzy title hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatch {
    pub movie_id: MovieId,
    pub title: String,
    /// Token-sort ratio, 0-100
    pub score: u8,
}

impl TitleMatch {
    /// Score on the 0-1 scale used by every other ranking
    pub fn similarity(&self) -> f32 {
        self.score as f32 / 100.0
    }
}

pub struct TitleMatcher {
    catalog: Arc<Catalog>,
    /// (movie id, token-sort key of its title), catalog order
    keys: Vec<(MovieId, String)>,
    limit: usize,
}

impl TitleMatcher {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let keys = catalog
            .movies()
            .iter()
            .map(|m| (m.id, fuzzy::token_sort_key(&m.title)))
            .collect();

        Self {
            catalog,
            keys,
            limit: 10,
        }
    }

    /// Configure how many matches `find` returns at most (default: 10)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Titles scoring at least `threshold` against `query`, best first.
    ///
    /// An empty (or all-punctuation) query matches nothing.
    #[instrument(skip(self))]
    pub fn find(&self, query: &str, threshold: u8) -> Vec<TitleMatch> {
        let query_key = fuzzy::token_sort_key(query);
        if query_key.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<TitleMatch> = self
            .keys
            .par_iter()
            .filter_map(|(movie_id, key)| {
                let score = fuzzy::ratio(&query_key, key);
                if score < threshold {
                    return None;
                }
                let movie = self.catalog.get(*movie_id)?;
                Some(TitleMatch {
                    movie_id: *movie_id,
                    title: movie.title.clone(),
                    score,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        });
        matches.truncate(self.limit);

        debug!("Found {} title matches for {:?}", matches.len(), query);
        matches
    }

    /// Highest-scoring match, if any clears `threshold`
    pub fn best_match(&self, query: &str, threshold: u8) -> Option<TitleMatch> {
        self.find(query, threshold).into_iter().next()
    }
}

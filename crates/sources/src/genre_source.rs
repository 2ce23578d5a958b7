//! Genre Source - movies carrying any target genre
//!
//! Serves both the emotion query (target genres come from the emotion table)
//! and the explicit genre query.
//!
//! ## Algorithm
//! 1. Union the genre-index postings of every target genre
//! 2. Emit the matching movies once each, in catalog order

use crate::types::{Candidate, CandidateSource, QueryContext};
use catalog::{Catalog, MovieId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct GenreSource {
    catalog: Arc<Catalog>,
    source: CandidateSource,
}

impl GenreSource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            source: CandidateSource::Genre,
        }
    }

    /// Tag produced candidates with a different source (default: `Genre`)
    pub fn with_source(mut self, source: CandidateSource) -> Self {
        self.source = source;
        self
    }

    #[instrument(skip(self, context), fields(genres = context.target_genres.len()))]
    pub fn get_candidates(&self, context: &QueryContext) -> Vec<Candidate> {
        let matching: HashSet<MovieId> = context
            .target_genres
            .iter()
            .flat_map(|genre| self.catalog.get_movies_by_genre(genre).iter().copied())
            .collect();

        if matching.is_empty() {
            debug!("No movies in target genres {:?}", context.target_genres);
            return Vec::new();
        }

        let candidates: Vec<Candidate> = self
            .catalog
            .ids()
            .filter(|id| matching.contains(id))
            .map(|id| Candidate::new(id, self.source, 0.0))
            .collect();

        debug!("Generated {} genre candidates", candidates.len());
        candidates
    }
}

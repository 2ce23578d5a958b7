//! Filter to ensure a minimum rating.
//!
//! Used by the emotion and genre rankers; similarity ranking has no rating
//! floor.

use crate::traits::Filter;
use anyhow::Result;
use catalog::Catalog;
use sources::{Candidate, QueryContext};
use std::sync::Arc;

/// Removes candidates rated below `min_rating` (0-10 scale).
///
/// Candidates missing from the catalog are removed too.
pub struct MinimumRatingFilter {
    catalog: Arc<Catalog>,
    min_rating: f32,
}

impl MinimumRatingFilter {
    /// # Arguments
    /// * `catalog` - Shared catalog for rating lookups
    /// * `min_rating` - Inclusive floor (typically 6.0)
    pub fn new(catalog: Arc<Catalog>, min_rating: f32) -> Self {
        Self { catalog, min_rating }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _context: &QueryContext) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| {
                self.catalog
                    .get(candidate.movie_id)
                    .is_some_and(|movie| movie.rating >= self.min_rating)
            })
            .collect();

        Ok(filtered)
    }
}

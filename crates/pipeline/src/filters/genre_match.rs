//! Filter to keep only movies in the query's target genres.

use crate::traits::Filter;
use anyhow::Result;
use catalog::Catalog;
use sources::{Candidate, QueryContext};
use std::sync::Arc;

/// Keeps candidates carrying at least one of `context.target_genres`.
///
/// ## Algorithm
/// 1. Look up each candidate's genre set in the catalog
/// 2. Keep it if the set intersects the target genres
///
/// An empty target set keeps nothing.
pub struct GenreMatchFilter {
    catalog: Arc<Catalog>,
}

impl GenreMatchFilter {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl Filter for GenreMatchFilter {
    fn name(&self) -> &str {
        "GenreMatchFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &QueryContext) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| match self.catalog.get(candidate.movie_id) {
                Some(movie) => movie
                    .genres
                    .iter()
                    .any(|genre| context.target_genres.contains(genre)),
                None => false,
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::MovieRecord;
    use sources::CandidateSource;

    fn create_test_catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::build(vec![
                MovieRecord::new(1, "Laugh Riot", "jokes galore").with_genres(["Comedy"]),
                MovieRecord::new(2, "Night Terror", "ghosts haunt").with_genres(["Horror"]),
                MovieRecord::new(3, "Quest", "dragons everywhere").with_genres(["Adventure", "Horror"]),
                MovieRecord::new(4, "Untagged", "nobody tagged this"),
            ])
            .unwrap(),
        )
    }

    fn candidates() -> Vec<Candidate> {
        (1..=4)
            .map(|id| Candidate::new(id, CandidateSource::Genre, 0.0))
            .collect()
    }

    #[test]
    fn test_genre_match_filter() {
        let filter = GenreMatchFilter::new(create_test_catalog());
        let context = QueryContext::new().with_target_genres(["Comedy", "Adventure"]);

        let filtered = filter.apply(candidates(), &context).unwrap();
        let ids: Vec<_> = filtered.iter().map(|c| c.movie_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_genre_match_is_case_sensitive_and_empty_keeps_nothing() {
        let filter = GenreMatchFilter::new(create_test_catalog());

        let lowercase = QueryContext::new().with_target_genres(["comedy"]);
        assert!(filter.apply(candidates(), &lowercase).unwrap().is_empty());
        assert!(filter.apply(candidates(), &QueryContext::new()).unwrap().is_empty());
    }
}

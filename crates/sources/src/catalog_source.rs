//! Catalog Source - every movie is a candidate
//!
//! Feeds the title-similarity query: the anchor is compared against the
//! whole catalog. Excluding the anchor itself is left to the pipeline.

use crate::types::{Candidate, CandidateSource, QueryContext};
use catalog::Catalog;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct CatalogSource {
    catalog: Arc<Catalog>,
}

impl CatalogSource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// One unscored candidate per catalog entry, catalog order
    #[instrument(skip(self, context), fields(anchor = ?context.anchor))]
    pub fn get_candidates(&self, context: &QueryContext) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = self
            .catalog
            .ids()
            .map(|id| Candidate::new(id, CandidateSource::TitleSimilarity, 0.0))
            .collect();

        debug!("Generated {} catalog candidates", candidates.len());
        candidates
    }
}

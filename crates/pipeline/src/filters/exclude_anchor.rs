//! Filter to remove the anchor movie from its own similarity results.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, QueryContext};

/// Removes the candidate whose id is the query's anchor, if any.
pub struct ExcludeAnchorFilter;

impl Filter for ExcludeAnchorFilter {
    fn name(&self) -> &str {
        "ExcludeAnchorFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &QueryContext) -> Result<Vec<Candidate>> {
        let Some(anchor) = context.anchor else {
            return Ok(candidates);
        };
        Ok(candidates
            .into_iter()
            .filter(|candidate| candidate.movie_id != anchor)
            .collect())
    }
}

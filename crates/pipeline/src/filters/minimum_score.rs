//! Filter to drop weakly scored candidates.
//!
//! Runs after scoring, since it reads `base_score`.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, QueryContext};

/// Keeps candidates whose `base_score >= min_score`.
pub struct MinimumScoreFilter {
    min_score: f32,
}

impl MinimumScoreFilter {
    pub fn new(min_score: f32) -> Self {
        Self { min_score }
    }
}

impl Filter for MinimumScoreFilter {
    fn name(&self) -> &str {
        "MinimumScoreFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _context: &QueryContext) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| candidate.base_score >= self.min_score)
            .collect())
    }
}

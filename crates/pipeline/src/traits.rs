//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to candidate sets.

use anyhow::Result;
use sources::{Candidate, QueryContext};

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// - `Send + Sync` so a pipeline can be shared by concurrent queries
/// - Filters take ownership of the Vec<Candidate> and return a filtered Vec
/// - Filters never reorder; ranking happens after filtering
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `context` - The query: anchor movie and/or target genres
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - The filtered candidates
    /// * `Err` - If filtering fails
    fn apply(&self, candidates: Vec<Candidate>, context: &QueryContext) -> Result<Vec<Candidate>>;
}

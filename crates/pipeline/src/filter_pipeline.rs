//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::traits::Filter;
use anyhow::{Context, Result};
use sources::{Candidate, QueryContext};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(ExcludeAnchorFilter)
///     .add_filter(MinimumRatingFilter::new(catalog.clone(), 6.0));
///
/// let filtered = pipeline.apply(candidates, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the configured filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// ## Algorithm
    /// 1. Start with the input candidates
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count
    /// 3. Return final filtered set
    pub fn apply(&self, candidates: Vec<Candidate>, context: &QueryContext) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter
                .apply(current, context)
                .with_context(|| format!("Filter {} failed", filter.name()))?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{ExcludeAnchorFilter, MinimumScoreFilter};
    use sources::CandidateSource;

    struct FailingFilter;

    impl Filter for FailingFilter {
        fn name(&self) -> &str {
            "FailingFilter"
        }

        fn apply(&self, _candidates: Vec<Candidate>, _context: &QueryContext) -> Result<Vec<Candidate>> {
            anyhow::bail!("boom")
        }
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let candidates = vec![
            Candidate::new(1, CandidateSource::TitleSimilarity, 0.9),
            Candidate::new(2, CandidateSource::TitleSimilarity, 0.8),
        ];

        let filtered = pipeline.apply(candidates, &QueryContext::new()).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_filters_run_in_order() {
        let pipeline = FilterPipeline::new()
            .add_filter(ExcludeAnchorFilter)
            .add_filter(MinimumScoreFilter::new(0.5));
        assert_eq!(pipeline.filter_names(), vec!["ExcludeAnchorFilter", "MinimumScoreFilter"]);

        let candidates = vec![
            Candidate::new(1, CandidateSource::TitleSimilarity, 0.9),
            Candidate::new(2, CandidateSource::TitleSimilarity, 0.8),
            Candidate::new(3, CandidateSource::TitleSimilarity, 0.2),
        ];

        let filtered = pipeline.apply(candidates, &QueryContext::for_anchor(1)).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].movie_id, 2);
    }

    #[test]
    fn test_filter_error_names_the_filter() {
        let pipeline = FilterPipeline::new().add_filter(FailingFilter);
        let err = pipeline
            .apply(vec![Candidate::new(1, CandidateSource::Genre, 0.0)], &QueryContext::new())
            .unwrap_err();
        assert!(err.to_string().contains("FailingFilter"));
    }
}

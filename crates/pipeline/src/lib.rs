//! Pipeline for filtering, scoring and ranking movie candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - Scorers for similarity, emotion and genre queries
//! - Final ranking with deterministic tie-breaks
//!
//! ## Architecture
//! The pipeline processes candidates in stages:
//! 1. Filters remove unwanted candidates (the anchor, wrong genre, low rating)
//! 2. A scorer fills in `base_score` for the remaining candidates
//! 3. A second filter stage drops weak scores
//! 4. `rank_and_select` orders and truncates
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, SimilarityScorer, rank_and_select};
//! use pipeline::filters::*;
//!
//! let pre = FilterPipeline::new().add_filter(ExcludeAnchorFilter);
//! let post = FilterPipeline::new().add_filter(MinimumScoreFilter::new(0.1));
//!
//! let candidates = pre.apply(candidates, &context)?;
//! let scored = SimilarityScorer::new(catalog.clone()).score(candidates, anchor)?;
//! let kept = post.apply(scored, &context)?;
//! let top = rank_and_select(kept, &catalog, 5);
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod ranking;
pub mod scoring;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use ranking::rank_and_select;
pub use scoring::{
    EmotionScorer, EmotionWeights, GenreRatingScorer, GenreRatingWeights, SimilarityScorer,
    SimilarityWeights,
};
pub use traits::Filter;

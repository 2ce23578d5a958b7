//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod exclude_anchor;
pub mod genre_match;
pub mod minimum_rating;
pub mod minimum_score;

// Re-export for convenience
pub use exclude_anchor::ExcludeAnchorFilter;
pub use genre_match::GenreMatchFilter;
pub use minimum_rating::MinimumRatingFilter;
pub use minimum_score::MinimumScoreFilter;

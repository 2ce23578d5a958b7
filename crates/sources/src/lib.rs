//! # Sources Crate
//!
//! Turns a query into candidate movies.
//!
//! ## Components
//!
//! ### Title Matcher
//! Fuzzy title lookup ("the matriks" -> The Matrix):
//! - Token-sort Levenshtein ratio, 0-100
//! - Threshold 70 for search, 80 when resolving an anchor for similarity
//!
//! ### Emotion Table
//! Closed mapping from emotion labels (English or French) to genre sets.
//!
//! ### Candidate Sources
//! - `CatalogSource`: every movie, for "more like this title"
//! - `GenreSource`: movies in any target genre, for emotion and genre queries
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{Emotion, GenreSource, QueryContext, TitleMatcher, CandidateSource};
//! use std::sync::Arc;
//!
//! let matcher = TitleMatcher::new(catalog.clone());
//! let hits = matcher.find("the matriks", 70);
//!
//! let emotion: Emotion = "joie".parse()?;
//! let context = QueryContext::new().with_target_genres(emotion.genres().iter().copied());
//! let candidates = GenreSource::new(catalog.clone())
//!     .with_source(CandidateSource::Emotion)
//!     .get_candidates(&context);
//! ```

pub mod catalog_source;
pub mod emotion;
pub mod fuzzy;
pub mod genre_source;
pub mod title_matcher;
pub mod types;

pub use catalog_source::CatalogSource;
pub use emotion::{available_emotions, Emotion, UnknownEmotionError};
pub use genre_source::GenreSource;
pub use title_matcher::{TitleMatch, TitleMatcher, DEFAULT_TITLE_THRESHOLD};
pub use types::{Candidate, CandidateMetadata, CandidateSource, QueryContext};

//! Recommender crate: the query surface of the movie recommendation engine.
//!
//! This crate contains the orchestrator that coordinates all components
//! of the recommendation pipeline, its configuration and its error type.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::{Recommender, RecommenderConfig};
//! use std::path::Path;
//!
//! let config = RecommenderConfig::load(None)?;
//! let recommender = Recommender::from_file(Path::new("data/movies_metadata.csv"), config)?;
//!
//! let hits = recommender.find("the matriks");
//! let similar = recommender.rank(hits[0].movie.id, 5, 0.1)?;
//! let cheerful = recommender.recommend("joy", 5, 6.0)?;
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::RecommenderConfig;
pub use error::{RecommendError, Result};
pub use orchestrator::{parse_genre_list, Recommender, ScoredMovie, SimilarMovies};

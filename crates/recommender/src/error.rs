//! Errors surfaced by the recommender.

use catalog::{CatalogError, MovieId};
use sources::UnknownEmotionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    UnknownEmotion(#[from] UnknownEmotionError),

    #[error("Movie {0} not found in catalog")]
    UnknownMovie(MovieId),

    #[error("Failed to load config {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("Invalid environment override: {0}")]
    InvalidOverride(String),

    #[error(transparent)]
    Pipeline(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RecommendError>;

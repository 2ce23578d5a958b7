//! # Catalog Crate
//!
//! This crate owns the movie table and everything derived from it.
//!
//! ## Main Components
//!
//! - **types**: `MovieRecord`, `Catalog`, `CatalogStats`
//! - **index**: `Catalog::build`, the one-shot builder that freezes a catalog
//! - **text**: overview tokenization (stop words, unigrams + bigrams)
//! - **tfidf**: `TextFeatureModel`, per-movie `FeatureVector`s and cosine similarity
//! - **parser**: load JSON / JSON-lines movie tables
//! - **error**: `CatalogError`
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{Catalog, TextFeatureConfig};
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(
//!     Path::new("data/movies_metadata.csv"),
//!     &TextFeatureConfig::default(),
//! )?;
//!
//! let matrix = catalog.get_by_title("The Matrix").unwrap();
//! let score = catalog.similarity(matrix.id, 604);
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod text;
pub mod tfidf;
pub mod types;

pub use error::{CatalogError, Result};
pub use tfidf::{FeatureVector, TextFeatureConfig, TextFeatureModel};
pub use types::{Catalog, CatalogStats, MovieId, MovieRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_query() {
        let catalog = Catalog::build(vec![
            MovieRecord::new(1, "Toy Story", "toys come alive when nobody watches")
                .with_year(1995)
                .with_genres(["Animation", "Comedy", "Family"])
                .with_rating(8.3),
        ])
        .unwrap();

        let movie = catalog.get(1).unwrap();
        assert_eq!(movie.year, Some(1995));
        assert_eq!(movie.genres.len(), 3);
        assert_eq!(movie.genres_label(), "Animation, Comedy, Family");
        assert!(catalog.feature_vector(1).is_some());
    }

    #[test]
    fn test_empty_queries() {
        let catalog =
            Catalog::build(vec![MovieRecord::new(1, "Solo", "a lone smuggler")]).unwrap();

        assert!(catalog.get(999).is_none());
        assert!(catalog.get_by_title("Missing").is_none());
        assert!(catalog.get_movies_by_genre("Action").is_empty());
        assert!(catalog.feature_vector(999).is_none());
        assert_eq!(catalog.get(1).unwrap().genres_label(), "Unknown");
    }
}

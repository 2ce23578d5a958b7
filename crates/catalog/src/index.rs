//! Catalog building and indexing logic.
//!
//! `Catalog::build` is the only way to obtain a catalog. It:
//! 1. Rejects records that break the catalog invariants
//! 2. Deduplicates by case-insensitive title (first occurrence wins)
//! 3. Builds the genre index
//! 4. Fits the TF-IDF model over all overviews
//!
//! The result is frozen: a changed movie table means a fresh build.

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::tfidf::{TextFeatureConfig, TextFeatureModel};
use crate::types::*;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};

impl Catalog {
    /// Build a catalog with the default text feature settings
    pub fn build(records: Vec<MovieRecord>) -> Result<Self> {
        Self::build_with(records, &TextFeatureConfig::default())
    }

    /// Build a catalog from cleaned movie records.
    ///
    /// Fails with `CatalogError::EmptyCorpus` when no record survives, and
    /// with `CatalogError::InvalidValue` for a zero vocabulary cap.
    pub fn build_with(records: Vec<MovieRecord>, config: &TextFeatureConfig) -> Result<Self> {
        if config.max_features == 0 {
            return Err(CatalogError::InvalidValue {
                field: "max_features".to_string(),
                value: config.max_features.to_string(),
            });
        }

        let received = records.len();
        let mut movies: Vec<MovieRecord> = Vec::with_capacity(received);
        let mut positions: HashMap<MovieId, usize> = HashMap::with_capacity(received);
        let mut title_index: HashMap<String, MovieId> = HashMap::with_capacity(received);

        for mut record in records {
            if let Err(reason) = check_record(&record) {
                debug!("Skipping movie {}: {}", record.id, reason);
                continue;
            }

            let key = title_key(&record.title);
            if title_index.contains_key(&key) {
                debug!("Skipping duplicate title {:?} (id {})", record.title, record.id);
                continue;
            }
            if positions.contains_key(&record.id) {
                warn!("Skipping movie {:?}: id {} already used", record.title, record.id);
                continue;
            }

            record.title = record.title.trim().to_string();
            positions.insert(record.id, movies.len());
            title_index.insert(key, record.id);
            movies.push(record);
        }

        if movies.is_empty() {
            return Err(CatalogError::EmptyCorpus { received });
        }

        let genre_index = build_genre_index(&movies);

        let overviews: Vec<&str> = movies.iter().map(|m| m.overview.as_str()).collect();
        let features = TextFeatureModel::fit(&overviews, config);

        info!(
            "Built catalog: {} of {} records kept, {} genres, {} vocabulary terms",
            movies.len(),
            received,
            genre_index.len(),
            features.vocabulary_size()
        );

        Ok(Self {
            movies,
            positions,
            title_index,
            genre_index,
            features,
        })
    }

    /// Load a movie table from disk and build a catalog from it
    pub fn load_from_file(path: &Path, config: &TextFeatureConfig) -> Result<Self> {
        info!("Loading movie table from {:?}", path);
        let records = parser::parse_movies(path)?;
        Self::build_with(records, config)
    }

    /// Compute summary statistics
    pub fn stats(&self) -> CatalogStats {
        let n = self.movies.len();
        let (rating_sum, popularity_sum) = self
            .movies
            .iter()
            .fold((0.0_f64, 0.0_f64), |(r, p), m| {
                (r + m.rating as f64, p + m.popularity as f64)
            });

        let (avg_rating, avg_popularity) = if n > 0 {
            ((rating_sum / n as f64) as f32, (popularity_sum / n as f64) as f32)
        } else {
            (0.0, 0.0)
        };

        CatalogStats {
            movies: n,
            genres: self.genre_index.len(),
            avg_rating,
            avg_popularity,
            vocabulary_size: self.features.vocabulary_size(),
        }
    }
}

/// Key used for title deduplication and exact lookup
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Check the invariants every catalog record must hold
fn check_record(record: &MovieRecord) -> std::result::Result<(), String> {
    if record.title.trim().is_empty() {
        return Err("blank title".to_string());
    }
    if record.overview.trim().is_empty() {
        return Err("blank overview".to_string());
    }
    if !record.rating.is_finite() || !(0.0..=10.0).contains(&record.rating) {
        return Err(format!("rating {} outside 0-10", record.rating));
    }
    if !record.vote_count.is_finite() || record.vote_count < 0.0 {
        return Err(format!("invalid vote count {}", record.vote_count));
    }
    if !record.popularity.is_finite() || record.popularity < 0.0 {
        return Err(format!("invalid popularity {}", record.popularity));
    }
    Ok(())
}

fn build_genre_index(movies: &[MovieRecord]) -> BTreeMap<String, Vec<MovieId>> {
    let mut genre_index: BTreeMap<String, Vec<MovieId>> = BTreeMap::new();
    for movie in movies {
        for genre in &movie.genres {
            genre_index
                .entry(genre.clone())
                .or_insert_with(Vec::new)
                .push(movie.id);
        }
    }
    genre_index
}

//! Core domain types for the movie catalog.
//!
//! A `MovieRecord` is one cleaned row of the movie table. A `Catalog` is the
//! frozen collection of records plus everything derived from them (title and
//! genre indices, the TF-IDF model over overviews). Catalogs are only ever
//! produced by `Catalog::build`, see `index.rs`.

use crate::tfidf::{FeatureVector, TextFeatureModel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Movie Record
// =============================================================================

/// One movie, as handed to the catalog by the loading layer.
///
/// `rating` is on a 0-10 scale. `vote_count` and `popularity` are informational
/// for similarity ranking (vote count breaks ties) and feed the popularity term
/// of the emotion and genre rankers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub year: Option<u16>,
    /// Genre tags. A set, so duplicates collapse and iteration is sorted
    pub genres: BTreeSet<String>,
    /// Plot summary, used as the text-similarity document
    pub overview: String,
    pub rating: f32,
    pub vote_count: f32,
    pub popularity: f32,
}

impl MovieRecord {
    /// Create a record with no genres, no year and zeroed numeric fields.
    pub fn new(id: MovieId, title: impl Into<String>, overview: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            year: None,
            genres: BTreeSet::new(),
            overview: overview.into(),
            rating: 0.0,
            vote_count: 0.0,
            popularity: 0.0,
        }
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_vote_count(mut self, vote_count: f32) -> Self {
        self.vote_count = vote_count;
        self
    }

    pub fn with_popularity(mut self, popularity: f32) -> Self {
        self.popularity = popularity;
        self
    }

    /// Genres joined for display, "Unknown" when the record has none
    pub fn genres_label(&self) -> String {
        if self.genres.is_empty() {
            "Unknown".to_string()
        } else {
            self.genres.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
        }
    }
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Summary numbers about a built catalog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub movies: usize,
    /// Number of distinct genre tags across all records
    pub genres: usize,
    pub avg_rating: f32,
    pub avg_popularity: f32,
    pub vocabulary_size: usize,
}

// =============================================================================
// Catalog - The Frozen In-Memory Table
// =============================================================================

/// Immutable movie catalog with derived lookup structures.
///
/// Records cannot be added after build: the TF-IDF vocabulary is
/// corpus-wide, so a new record means a new build.
/// Share it across readers with `Arc<Catalog>`.
#[derive(Debug)]
pub struct Catalog {
    /// Records in build order (input order minus rejected rows)
    pub(crate) movies: Vec<MovieRecord>,
    /// MovieId -> position in `movies` and in the feature model
    pub(crate) positions: HashMap<MovieId, usize>,
    /// Case-folded, trimmed title -> MovieId
    pub(crate) title_index: HashMap<String, MovieId>,
    /// Genre tag -> movies carrying it, in build order
    pub(crate) genre_index: BTreeMap<String, Vec<MovieId>>,
    /// TF-IDF vectors, one per record, same order as `movies`
    pub(crate) features: TextFeatureModel,
}

impl Catalog {
    /// Get a movie by ID
    pub fn get(&self, id: MovieId) -> Option<&MovieRecord> {
        self.positions.get(&id).map(|&pos| &self.movies[pos])
    }

    /// Exact title lookup, ignoring case and surrounding whitespace
    pub fn get_by_title(&self, title: &str) -> Option<&MovieRecord> {
        self.title_index
            .get(&crate::index::title_key(title))
            .and_then(|&id| self.get(id))
    }

    /// All records in build order
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    /// All movie IDs in build order
    pub fn ids(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.movies.iter().map(|m| m.id)
    }

    /// Get all movies tagged with a genre (exact, case-sensitive tag)
    pub fn get_movies_by_genre(&self, genre: &str) -> &[MovieId] {
        self.genre_index
            .get(genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct genre tags, sorted
    pub fn genres(&self) -> impl Iterator<Item = &str> + '_ {
        self.genre_index.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Always false for a successfully built catalog
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// The text feature model fitted on this catalog's overviews
    pub fn features(&self) -> &TextFeatureModel {
        &self.features
    }

    /// TF-IDF vector of one movie's overview
    pub fn feature_vector(&self, id: MovieId) -> Option<&FeatureVector> {
        self.positions
            .get(&id)
            .and_then(|&pos| self.features.vector(pos))
    }

    /// Cosine similarity of two movies' overviews, in [0, 1].
    ///
    /// Returns 0.0 when either ID is unknown or either overview produced no
    /// vocabulary terms.
    pub fn similarity(&self, a: MovieId, b: MovieId) -> f32 {
        match (self.positions.get(&a), self.positions.get(&b)) {
            (Some(&pa), Some(&pb)) => self.features.similarity(pa, pb),
            _ => 0.0,
        }
    }
}

//! Candidate and query types shared by sources and the pipeline.

use catalog::MovieId;
use std::collections::BTreeSet;

/// Which query produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// Every other catalog entry, scored against an anchor title
    TitleSimilarity,
    /// Entries in the genre set mapped from an emotion
    Emotion,
    /// Entries carrying any of a caller-supplied list of genres
    Genre,
}

/// Per-component scores recorded while scoring, kept for explanations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateMetadata {
    /// How many of the target genres the movie carries
    pub matched_genres: Option<usize>,
    pub genre_score: Option<f32>,
    pub content_score: Option<f32>,
    pub rating_score: Option<f32>,
    pub popularity_score: Option<f32>,
}

/// A movie under consideration for one query
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub movie_id: MovieId,
    pub source: CandidateSource,
    /// Combined score; 0.0 until a scorer fills it in
    pub base_score: f32,
    pub metadata: CandidateMetadata,
}

impl Candidate {
    pub fn new(movie_id: MovieId, source: CandidateSource, base_score: f32) -> Self {
        Self {
            movie_id,
            source,
            base_score,
            metadata: CandidateMetadata::default(),
        }
    }
}

/// What a query is about: an anchor movie, a target genre set, or both
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryContext {
    /// Movie the query is anchored on; never recommended back
    pub anchor: Option<MovieId>,
    pub target_genres: BTreeSet<String>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for "more like this movie"
    pub fn for_anchor(anchor: MovieId) -> Self {
        Self {
            anchor: Some(anchor),
            target_genres: BTreeSet::new(),
        }
    }

    pub fn with_target_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_genres = genres.into_iter().map(Into::into).collect();
        self
    }
}

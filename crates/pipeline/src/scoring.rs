//! Candidate scoring.
//!
//! Three scorers fill in `Candidate::base_score` (and the per-component
//! numbers in `metadata`) for the three kinds of query:
//!
//! - `SimilarityScorer`: hybrid genre + content + rating similarity to an anchor
//! - `EmotionScorer`: genre-match fraction + rating + popularity
//! - `GenreRatingScorer`: rating + popularity, for explicit genre queries
//!
//! Scoring is pure and runs with rayon; output order always equals input
//! order, so results are identical run to run.

use anyhow::{anyhow, Result};
use catalog::{Catalog, MovieId, MovieRecord};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sources::{Candidate, CandidateMetadata};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument};

// =============================================================================
// Component Similarities
// =============================================================================

/// Jaccard similarity of two genre sets; 0.0 when both are empty
pub fn genre_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f32 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

/// Closeness of two 0-10 ratings: `max(0, 1 - |r1 - r2| / 10)`
pub fn rating_similarity(r1: f32, r2: f32) -> f32 {
    (1.0 - (r1 - r2).abs() / 10.0).max(0.0)
}

/// Log-scaled popularity: `ln(1 + popularity) / 10`
///
/// Exceeds 1.0 past a popularity of about 22025; weighted totals are clamped.
pub fn popularity_score(popularity: f32) -> f32 {
    ((popularity.max(0.0) as f64).ln_1p() / 10.0) as f32
}

/// Fraction of `target` genres the movie carries; 0.0 for an empty target
pub fn genre_match_fraction(genres: &BTreeSet<String>, target: &BTreeSet<String>) -> (usize, f32) {
    if target.is_empty() {
        return (0, 0.0);
    }
    let matched = target.iter().filter(|g| genres.contains(*g)).count();
    (matched, matched as f32 / target.len() as f32)
}

// =============================================================================
// Weights
// =============================================================================

/// Weights of the hybrid similarity score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityWeights {
    pub genre: f32,
    pub content: f32,
    pub rating: f32,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            genre: 0.4,
            content: 0.4,
            rating: 0.2,
        }
    }
}

/// Weights of the emotion score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionWeights {
    pub genre: f32,
    pub rating: f32,
    pub popularity: f32,
}

impl Default for EmotionWeights {
    fn default() -> Self {
        Self {
            genre: 0.5,
            rating: 0.3,
            popularity: 0.2,
        }
    }
}

/// Weights of the genre-and-rating score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenreRatingWeights {
    pub rating: f32,
    pub popularity: f32,
}

impl Default for GenreRatingWeights {
    fn default() -> Self {
        Self {
            rating: 0.7,
            popularity: 0.3,
        }
    }
}

// =============================================================================
// Similarity Scorer
// =============================================================================

/// Scores candidates by hybrid similarity to one anchor movie.
///
/// ## Algorithm
/// For each candidate movie `m` and anchor `a`:
/// - genre   = Jaccard(a.genres, m.genres)
/// - content = cosine(tfidf(a.overview), tfidf(m.overview))
/// - rating  = max(0, 1 - |a.rating - m.rating| / 10)
/// - score   = 0.4 * genre + 0.4 * content + 0.2 * rating, clamped to [0, 1]
#[derive(Clone)]
pub struct SimilarityScorer {
    catalog: Arc<Catalog>,
    weights: SimilarityWeights,
}

impl SimilarityScorer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            weights: SimilarityWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: SimilarityWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    /// Score every candidate against `anchor`.
    ///
    /// Candidates missing from the catalog are dropped. Fails only when the
    /// anchor itself is unknown.
    #[instrument(skip(self, candidates), fields(count = candidates.len()))]
    pub fn score(&self, candidates: Vec<Candidate>, anchor: MovieId) -> Result<Vec<Candidate>> {
        let anchor_movie = self
            .catalog
            .get(anchor)
            .ok_or_else(|| anyhow!("Anchor movie {} not found", anchor))?;

        let scored: Vec<Candidate> = candidates
            .into_par_iter()
            .filter_map(|mut candidate| {
                let movie = self.catalog.get(candidate.movie_id)?;
                let (score, metadata) = self.score_pair(anchor_movie, movie);
                candidate.base_score = score;
                candidate.metadata = metadata;
                Some(candidate)
            })
            .collect();

        debug!("Scored {} candidates against movie {}", scored.len(), anchor);
        Ok(scored)
    }

    /// Combined score and its components for one pair
    pub fn score_pair(&self, anchor: &MovieRecord, movie: &MovieRecord) -> (f32, CandidateMetadata) {
        let genre = genre_similarity(&anchor.genres, &movie.genres);
        let content = self.catalog.similarity(anchor.id, movie.id);
        let rating = rating_similarity(anchor.rating, movie.rating);

        let w = &self.weights;
        let score = (w.genre * genre + w.content * content + w.rating * rating).clamp(0.0, 1.0);

        let metadata = CandidateMetadata {
            matched_genres: Some(anchor.genres.intersection(&movie.genres).count()),
            genre_score: Some(genre),
            content_score: Some(content),
            rating_score: Some(rating),
            popularity_score: None,
        };
        (score, metadata)
    }
}

// =============================================================================
// Emotion Scorer
// =============================================================================

/// Scores candidates for an emotion's genre set.
///
/// ## Algorithm
/// - genre      = |movie.genres ∩ target| / |target|
/// - rating     = movie.rating / 10
/// - popularity = ln(1 + movie.popularity) / 10
/// - score      = 0.5 * genre + 0.3 * rating + 0.2 * popularity, clamped to [0, 1]
#[derive(Clone)]
pub struct EmotionScorer {
    catalog: Arc<Catalog>,
    weights: EmotionWeights,
}

impl EmotionScorer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            weights: EmotionWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: EmotionWeights) -> Self {
        self.weights = weights;
        self
    }

    #[instrument(skip(self, candidates, target_genres), fields(count = candidates.len()))]
    pub fn score(&self, candidates: Vec<Candidate>, target_genres: &BTreeSet<String>) -> Vec<Candidate> {
        let w = self.weights;
        candidates
            .into_par_iter()
            .filter_map(|mut candidate| {
                let movie = self.catalog.get(candidate.movie_id)?;
                let (matched, genre) = genre_match_fraction(&movie.genres, target_genres);
                let rating = (movie.rating / 10.0).clamp(0.0, 1.0);
                let popularity = popularity_score(movie.popularity);

                candidate.base_score =
                    (w.genre * genre + w.rating * rating + w.popularity * popularity).clamp(0.0, 1.0);
                candidate.metadata = CandidateMetadata {
                    matched_genres: Some(matched),
                    genre_score: Some(genre),
                    content_score: None,
                    rating_score: Some(rating),
                    popularity_score: Some(popularity),
                };
                Some(candidate)
            })
            .collect()
    }
}

// =============================================================================
// Genre + Rating Scorer
// =============================================================================

/// Scores candidates of an explicit genre query by quality alone:
/// `0.7 * rating / 10 + 0.3 * ln(1 + popularity) / 10`.
#[derive(Clone)]
pub struct GenreRatingScorer {
    catalog: Arc<Catalog>,
    weights: GenreRatingWeights,
}

impl GenreRatingScorer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            weights: GenreRatingWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: GenreRatingWeights) -> Self {
        self.weights = weights;
        self
    }

    #[instrument(skip(self, candidates, target_genres), fields(count = candidates.len()))]
    pub fn score(&self, candidates: Vec<Candidate>, target_genres: &BTreeSet<String>) -> Vec<Candidate> {
        let w = self.weights;
        candidates
            .into_par_iter()
            .filter_map(|mut candidate| {
                let movie = self.catalog.get(candidate.movie_id)?;
                let rating = (movie.rating / 10.0).clamp(0.0, 1.0);
                let popularity = popularity_score(movie.popularity);
                let matched = target_genres.iter().filter(|g| movie.genres.contains(*g)).count();

                candidate.base_score = (w.rating * rating + w.popularity * popularity).clamp(0.0, 1.0);
                candidate.metadata = CandidateMetadata {
                    matched_genres: Some(matched),
                    genre_score: None,
                    content_score: None,
                    rating_score: Some(rating),
                    popularity_score: Some(popularity),
                };
                Some(candidate)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sources::CandidateSource;

    fn genres(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn create_test_catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::build(vec![
                MovieRecord::new(1, "The Matrix", "hacker discovers simulated reality")
                    .with_genres(["Action", "Science Fiction"])
                    .with_rating(8.7)
                    .with_popularity(50.0),
                MovieRecord::new(2, "Hackers", "teen hacker crew uncovers plot")
                    .with_genres(["Action", "Crime"])
                    .with_rating(6.5)
                    .with_popularity(10.0),
                MovieRecord::new(3, "Quiet Days", "widow tends garden")
                    .with_genres(["Drama"])
                    .with_rating(7.0),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_genre_similarity() {
        assert_eq!(genre_similarity(&genres(&[]), &genres(&[])), 0.0);
        assert_eq!(genre_similarity(&genres(&["A"]), &genres(&["A"])), 1.0);
        assert_eq!(genre_similarity(&genres(&["A", "B"]), &genres(&["B", "C"])), 1.0 / 3.0);
        assert_eq!(genre_similarity(&genres(&["A"]), &genres(&[])), 0.0);
    }

    #[test]
    fn test_rating_similarity() {
        assert_eq!(rating_similarity(7.0, 7.0), 1.0);
        assert!((rating_similarity(8.0, 6.0) - 0.8).abs() < 1e-6);
        assert_eq!(rating_similarity(0.0, 10.0), 0.0);
        assert_eq!(rating_similarity(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_popularity_score() {
        assert_eq!(popularity_score(0.0), 0.0);
        assert!((popularity_score(9.0) - (10.0_f32).ln() / 10.0).abs() < 1e-6);
        assert!((popularity_score(1e9) - (1e9_f64.ln_1p() / 10.0) as f32).abs() < 1e-5);
        assert!(popularity_score(1e9) > 1.0);
        assert_eq!(popularity_score(-5.0), 0.0);
    }

    #[test]
    fn test_genre_match_fraction() {
        let target = genres(&["Comedy", "Adventure", "Family", "Animation"]);
        assert_eq!(genre_match_fraction(&genres(&["Comedy", "Drama"]), &target), (1, 0.25));
        assert_eq!(genre_match_fraction(&genres(&["Comedy"]), &genres(&[])), (0, 0.0));
    }

    #[test]
    fn test_similarity_scorer_components() {
        let catalog = create_test_catalog();
        let scorer = SimilarityScorer::new(catalog.clone());
        let candidates = vec![
            Candidate::new(2, CandidateSource::TitleSimilarity, 0.0),
            Candidate::new(3, CandidateSource::TitleSimilarity, 0.0),
            Candidate::new(999, CandidateSource::TitleSimilarity, 0.0),
        ];

        let scored = scorer.score(candidates, 1).unwrap();
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].movie_id, 2);

        let hackers = &scored[0];
        let genre = hackers.metadata.genre_score.unwrap();
        let content = hackers.metadata.content_score.unwrap();
        let rating = hackers.metadata.rating_score.unwrap();
        assert!((genre - 1.0 / 3.0).abs() < 1e-6);
        assert!(content > 0.0);
        assert!((rating - 0.78).abs() < 1e-5);
        let expected = 0.4 * genre + 0.4 * content + 0.2 * rating;
        assert!((hackers.base_score - expected).abs() < 1e-6);

        // Drama with no shared words: only rating closeness counts
        let quiet = &scored[1];
        assert_eq!(quiet.metadata.genre_score, Some(0.0));
        assert_eq!(quiet.metadata.content_score, Some(0.0));
        assert!((quiet.base_score - 0.2 * 0.83).abs() < 1e-5);
        assert!(hackers.base_score > quiet.base_score);
    }

    #[test]
    fn test_similarity_scorer_unknown_anchor() {
        let scorer = SimilarityScorer::new(create_test_catalog());
        assert!(scorer.score(Vec::new(), 42).is_err());
    }

    #[test]
    fn test_similarity_scorer_custom_weights() {
        let weights = SimilarityWeights {
            genre: 0.0,
            content: 0.0,
            rating: 1.0,
        };
        let scorer = SimilarityScorer::new(create_test_catalog()).with_weights(weights);
        let scored = scorer
            .score(vec![Candidate::new(3, CandidateSource::TitleSimilarity, 0.0)], 1)
            .unwrap();
        assert!((scored[0].base_score - 0.83).abs() < 1e-5);
    }

    #[test]
    fn test_emotion_scorer() {
        let scorer = EmotionScorer::new(create_test_catalog());
        let target = genres(&["Action", "Thriller", "Crime"]);
        let scored = scorer.score(
            vec![
                Candidate::new(1, CandidateSource::Emotion, 0.0),
                Candidate::new(2, CandidateSource::Emotion, 0.0),
            ],
            &target,
        );

        let matrix = &scored[0];
        assert_eq!(matrix.metadata.matched_genres, Some(1));
        let expected = 0.5 * (1.0 / 3.0) + 0.3 * 0.87 + 0.2 * popularity_score(50.0);
        assert!((matrix.base_score - expected).abs() < 1e-5);

        let hackers = &scored[1];
        assert_eq!(hackers.metadata.matched_genres, Some(2));
        assert!((hackers.metadata.genre_score.unwrap() - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_genre_rating_scorer() {
        let scorer = GenreRatingScorer::new(create_test_catalog());
        let scored = scorer.score(
            vec![
                Candidate::new(1, CandidateSource::Genre, 0.0),
                Candidate::new(3, CandidateSource::Genre, 0.0),
            ],
            &genres(&["Action"]),
        );

        let expected = 0.7 * 0.87 + 0.3 * popularity_score(50.0);
        assert!((scored[0].base_score - expected).abs() < 1e-5);
        assert!((scored[1].base_score - 0.7 * 0.7).abs() < 1e-5);
        assert_eq!(scored[1].metadata.matched_genres, Some(0));
    }
}

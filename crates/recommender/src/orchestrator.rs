//! # Recommendation Orchestrator
//!
//! Wires sources, filters, scorers and ranking into the query operations:
//!
//! - `find`: fuzzy title search
//! - `rank`: movies most similar to an anchor movie
//! - `recommend_similar`: `find` with the stricter threshold, then `rank`
//! - `recommend`: movies for an emotion label
//! - `recommend_by_genres`: best-rated movies in any of a list of genres
//!
//! Every query is a pure read of the shared catalog, so one `Recommender`
//! can serve concurrent callers.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tracing::{debug, info, instrument};

use catalog::{Catalog, MovieId, MovieRecord};
use pipeline::filters::{ExcludeAnchorFilter, GenreMatchFilter, MinimumRatingFilter, MinimumScoreFilter};
use pipeline::{rank_and_select, EmotionScorer, FilterPipeline, GenreRatingScorer, SimilarityScorer};
use sources::{
    available_emotions, Candidate, CandidateSource, CatalogSource, Emotion, GenreSource,
    QueryContext, TitleMatch, TitleMatcher,
};

use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};

/// One recommended (or matched) movie
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMovie {
    pub movie: MovieRecord,
    /// In [0, 1]
    pub score: f32,
    pub source: CandidateSource,
    pub explanation: String,
}

impl ScoredMovie {
    /// Score as a percentage, for display
    pub fn percent(&self) -> f32 {
        self.score * 100.0
    }
}

/// Result of `recommend_similar`: the resolved title and its neighbours
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarMovies {
    pub matched: ScoredMovie,
    pub recommendations: Vec<ScoredMovie>,
}

/// Main orchestrator that coordinates the recommendation pipeline
pub struct Recommender {
    catalog: Arc<Catalog>,
    config: RecommenderConfig,
    title_matcher: TitleMatcher,
    catalog_source: CatalogSource,
    genre_source: GenreSource,
    similarity_scorer: SimilarityScorer,
    emotion_scorer: EmotionScorer,
    genre_scorer: GenreRatingScorer,
    /// Filters applied before similarity scoring
    similarity_filters: FilterPipeline,
}

impl Recommender {
    /// Create a recommender over an already built catalog
    pub fn new(catalog: Arc<Catalog>, config: RecommenderConfig) -> Self {
        let title_matcher =
            TitleMatcher::new(catalog.clone()).with_limit(config.title_match_limit);
        let catalog_source = CatalogSource::new(catalog.clone());
        let genre_source = GenreSource::new(catalog.clone());
        let similarity_scorer =
            SimilarityScorer::new(catalog.clone()).with_weights(config.similarity_weights);
        let emotion_scorer = EmotionScorer::new(catalog.clone()).with_weights(config.emotion_weights);
        let genre_scorer = GenreRatingScorer::new(catalog.clone()).with_weights(config.genre_weights);
        let similarity_filters = FilterPipeline::new().add_filter(ExcludeAnchorFilter);

        Self {
            catalog,
            config,
            title_matcher,
            catalog_source,
            genre_source,
            similarity_scorer,
            emotion_scorer,
            genre_scorer,
            similarity_filters,
        }
    }

    /// Load a movie table, build the catalog and wrap it in a recommender
    pub fn from_file(path: &Path, config: RecommenderConfig) -> Result<Self> {
        let start_time = Instant::now();
        let catalog = Catalog::load_from_file(path, &config.text_features())?;
        info!("Catalog ready in {:.2?}", start_time.elapsed());
        Ok(Self::new(Arc::new(catalog), config))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Every accepted emotion label, sorted
    pub fn available_emotions(&self) -> Vec<&'static str> {
        available_emotions()
    }

    // =========================================================================
    // Title search
    // =========================================================================

    /// Fuzzy title search with the configured threshold (default 70)
    pub fn find(&self, query: &str) -> Vec<ScoredMovie> {
        self.find_with_threshold(query, self.config.title_threshold)
    }

    /// Fuzzy title search; scores are the match ratio divided by 100
    #[instrument(skip(self))]
    pub fn find_with_threshold(&self, query: &str, threshold: u8) -> Vec<ScoredMovie> {
        let matches = self.title_matcher.find(query, threshold);
        info!("Title search {:?}: {} matches", query, matches.len());
        matches
            .into_iter()
            .filter_map(|m| self.title_match_to_scored(m))
            .collect()
    }

    fn title_match_to_scored(&self, title_match: TitleMatch) -> Option<ScoredMovie> {
        let movie = self.catalog.get(title_match.movie_id)?;
        Some(ScoredMovie {
            movie: movie.clone(),
            score: title_match.similarity(),
            source: CandidateSource::TitleSimilarity,
            explanation: format!("Title match {}%", title_match.score),
        })
    }

    // =========================================================================
    // Similarity
    // =========================================================================

    /// Movies most similar to `anchor`, best first, never including `anchor`.
    ///
    /// Fails with `UnknownMovie` when `anchor` is not in the catalog.
    #[instrument(skip(self))]
    pub fn rank(&self, anchor: MovieId, n: usize, min_score: f32) -> Result<Vec<ScoredMovie>> {
        let start_time = Instant::now();
        if self.catalog.get(anchor).is_none() {
            return Err(RecommendError::UnknownMovie(anchor));
        }
        let context = QueryContext::for_anchor(anchor);

        let candidates = self.catalog_source.get_candidates(&context);
        let candidates = self
            .similarity_filters
            .apply(candidates, &context)
            .context("Failed to apply similarity filters")?;

        let scored = self
            .similarity_scorer
            .score(candidates, anchor)
            .context("Failed to score candidates")?;

        let kept = FilterPipeline::new()
            .add_filter(MinimumScoreFilter::new(min_score))
            .apply(scored, &context)
            .context("Failed to apply score threshold")?;
        debug!("{} candidates at or above score {}", kept.len(), min_score);

        let recommendations = self.select(kept, n, explain_similarity);
        info!(
            "Ranked {} similar movies for {} in {:.2?}",
            recommendations.len(),
            anchor,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Resolve `title`, then `rank`.
    ///
    /// An exact title (ignoring case) wins outright; otherwise the best fuzzy
    /// match at the stricter similar-title threshold is used.
    /// `Ok(None)` when no catalog title is close enough.
    pub fn recommend_similar(
        &self,
        title: &str,
        n: usize,
        min_score: f32,
    ) -> Result<Option<SimilarMovies>> {
        let Some(best) = self.resolve_anchor(title) else {
            info!("No title close enough to {:?}", title);
            return Ok(None);
        };

        let recommendations = self.rank(best.movie_id, n, min_score)?;
        let matched = self
            .title_match_to_scored(best.clone())
            .ok_or(RecommendError::UnknownMovie(best.movie_id))?;

        Ok(Some(SimilarMovies {
            matched,
            recommendations,
        }))
    }

    fn resolve_anchor(&self, title: &str) -> Option<TitleMatch> {
        if let Some(movie) = self.catalog.get_by_title(title) {
            debug!("Exact title match for {:?}: {}", title, movie.id);
            return Some(TitleMatch {
                movie_id: movie.id,
                title: movie.title.clone(),
                score: 100,
            });
        }
        self.title_matcher
            .best_match(title, self.config.similar_title_threshold)
    }

    // =========================================================================
    // Emotion and genre queries
    // =========================================================================

    /// Movies for an emotion label (English or French, any case)
    pub fn recommend(&self, emotion: &str, n: usize, min_rating: f32) -> Result<Vec<ScoredMovie>> {
        let emotion = Emotion::parse(emotion)?;
        self.recommend_emotion(emotion, n, min_rating)
    }

    /// Movies rated at least `min_rating` in the emotion's genre set
    #[instrument(skip(self))]
    pub fn recommend_emotion(
        &self,
        emotion: Emotion,
        n: usize,
        min_rating: f32,
    ) -> Result<Vec<ScoredMovie>> {
        let context = QueryContext::new().with_target_genres(emotion.genres().iter().copied());

        let candidates = self.genre_candidates(&context, CandidateSource::Emotion, min_rating)?;
        let scored = self.emotion_scorer.score(candidates, &context.target_genres);

        let target_len = context.target_genres.len();
        let recommendations = self.select(scored, n, |candidate, _| {
            let matched = candidate.metadata.matched_genres.unwrap_or(0);
            format!("Matches {}/{} {} genres", matched, target_len, emotion)
        });
        info!(
            "Emotion {} -> {} recommendations",
            emotion,
            recommendations.len()
        );
        Ok(recommendations)
    }

    /// Best movies carrying any of `genres` (exact tags), rated at least `min_rating`
    pub fn recommend_by_genres<I, S>(
        &self,
        genres: I,
        n: usize,
        min_rating: f32,
    ) -> Result<Vec<ScoredMovie>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let context = QueryContext::new().with_target_genres(genres);
        let candidates = self.genre_candidates(&context, CandidateSource::Genre, min_rating)?;
        let scored = self.genre_scorer.score(candidates, &context.target_genres);

        let recommendations = self.select(scored, n, |_, movie| {
            format!("Rated {:.1} in {}", movie.rating, movie.genres_label())
        });
        info!(
            "Genres {:?} -> {} recommendations",
            context.target_genres,
            recommendations.len()
        );
        Ok(recommendations)
    }

    /// Candidates in the target genres that clear the rating floor
    fn genre_candidates(
        &self,
        context: &QueryContext,
        source: CandidateSource,
        min_rating: f32,
    ) -> Result<Vec<Candidate>> {
        let candidates: Vec<Candidate> = self
            .genre_source
            .get_candidates(context)
            .into_iter()
            .map(|mut candidate| {
                candidate.source = source;
                candidate
            })
            .collect();

        let filtered = FilterPipeline::new()
            .add_filter(GenreMatchFilter::new(self.catalog.clone()))
            .add_filter(MinimumRatingFilter::new(self.catalog.clone(), min_rating))
            .apply(candidates, context)
            .context("Failed to apply genre filters")?;
        Ok(filtered)
    }

    /// Rank, truncate and attach records and explanations
    fn select<F>(&self, candidates: Vec<Candidate>, n: usize, explain: F) -> Vec<ScoredMovie>
    where
        F: Fn(&Candidate, &MovieRecord) -> String,
    {
        rank_and_select(candidates, &self.catalog, n)
            .into_iter()
            .map(|(candidate, movie)| ScoredMovie {
                explanation: explain(&candidate, movie),
                movie: movie.clone(),
                score: candidate.base_score,
                source: candidate.source,
            })
            .collect()
    }
}

fn explain_similarity(candidate: &Candidate, _movie: &MovieRecord) -> String {
    let meta = &candidate.metadata;
    format!(
        "Genre {:.0}%, content {:.0}%, rating {:.0}%",
        meta.genre_score.unwrap_or(0.0) * 100.0,
        meta.content_score.unwrap_or(0.0) * 100.0,
        meta.rating_score.unwrap_or(0.0) * 100.0
    )
}

/// Parse a comma-separated genre list ("Action, Sci-Fi") into tags
pub fn parse_genre_list(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

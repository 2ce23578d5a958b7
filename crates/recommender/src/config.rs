//! Recommender configuration.
//!
//! Layered: built-in defaults, then an optional JSON file, then environment
//! overrides (`N_RECOMMENDATIONS`, `MIN_SIMILARITY_SCORE`, `MIN_RATING`),
//! which may come from a `.env` file.
//! Any field missing from the file keeps its default.

use crate::error::{RecommendError, Result};
use catalog::TextFeatureConfig;
use pipeline::{EmotionWeights, GenreRatingWeights, SimilarityWeights};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const ENV_N_RECOMMENDATIONS: &str = "N_RECOMMENDATIONS";
pub const ENV_MIN_SIMILARITY_SCORE: &str = "MIN_SIMILARITY_SCORE";
pub const ENV_MIN_RATING: &str = "MIN_RATING";

/// Environment variables recognised by `apply_env` (matched case-insensitively)
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    n_recommendations: Option<usize>,
    min_similarity_score: Option<f32>,
    min_rating: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// TF-IDF vocabulary cap
    pub max_features: usize,
    /// Minimum fuzzy score (0-100) for title search
    pub title_threshold: u8,
    /// Stricter minimum used to resolve the anchor of a similarity query
    pub similar_title_threshold: u8,
    /// Most title matches returned by a search
    pub title_match_limit: usize,
    pub n_recommendations: usize,
    pub min_similarity_score: f32,
    /// Rating floor for emotion and genre queries
    pub min_rating: f32,
    pub similarity_weights: SimilarityWeights,
    pub emotion_weights: EmotionWeights,
    pub genre_weights: GenreRatingWeights,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            title_threshold: 70,
            similar_title_threshold: 80,
            title_match_limit: 10,
            n_recommendations: 5,
            min_similarity_score: 0.1,
            min_rating: 6.0,
            similarity_weights: SimilarityWeights::default(),
            emotion_weights: EmotionWeights::default(),
            genre_weights: GenreRatingWeights::default(),
        }
    }
}

impl RecommenderConfig {
    /// Defaults, overlaid with `path` when given, overlaid with the environment.
    ///
    /// A `.env` file in the working directory (or a parent) is read first;
    /// variables already set in the process take precedence over it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!("Loaded environment from {:?}", env_file);
        }
        Self::load_layers(path)
    }

    /// Like `load`, but reads variables from `env_file` instead of searching for `.env`
    pub fn load_with_env_file(path: Option<&Path>, env_file: &Path) -> Result<Self> {
        dotenvy::from_path(env_file).map_err(|e| RecommendError::Config {
            path: env_file.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!("Loaded environment from {:?}", env_file);
        Self::load_layers(path)
    }

    fn load_layers(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()
    }

    /// Read a JSON config file; absent fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_error = |reason: String| RecommendError::Config {
            path: path.display().to_string(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| config_error(e.to_string()))?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> Result<Self> {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
        self.apply_overrides(vars)
    }

    /// Apply overrides from any set of variables; blank values count as unset
    pub fn apply_overrides<I>(mut self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars = vars
            .into_iter()
            .map(|(key, value)| (key, value.trim().to_string()))
            .filter(|(_, value)| !value.is_empty());
        let overrides: EnvOverrides =
            envy::from_iter(vars).map_err(|e| RecommendError::InvalidOverride(e.to_string()))?;

        if let Some(n) = overrides.n_recommendations {
            self.n_recommendations = n;
        }
        if let Some(score) = overrides.min_similarity_score {
            self.min_similarity_score = score;
        }
        if let Some(rating) = overrides.min_rating {
            self.min_rating = rating;
        }
        Ok(self)
    }

    pub fn with_n_recommendations(mut self, n: usize) -> Self {
        self.n_recommendations = n;
        self
    }

    pub fn with_min_similarity_score(mut self, score: f32) -> Self {
        self.min_similarity_score = score;
        self
    }

    pub fn with_min_rating(mut self, rating: f32) -> Self {
        self.min_rating = rating;
        self
    }

    pub fn with_similarity_weights(mut self, weights: SimilarityWeights) -> Self {
        self.similarity_weights = weights;
        self
    }

    /// Settings for fitting the catalog's text model
    pub fn text_features(&self) -> TextFeatureConfig {
        TextFeatureConfig::default().with_max_features(self.max_features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = RecommenderConfig::default();
        assert_eq!(config.n_recommendations, 5);
        assert_eq!(config.title_threshold, 70);
        assert_eq!(config.similar_title_threshold, 80);
        assert_eq!(config.min_similarity_score, 0.1);
        assert_eq!(config.min_rating, 6.0);
        assert_eq!(config.similarity_weights.genre, 0.4);
        assert_eq!(config.emotion_weights.popularity, 0.2);
        assert_eq!(config.text_features().max_features, 5000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RecommenderConfig = serde_json::from_str(
            r#"{"n_recommendations": 8, "similarity_weights": {"content": 0.6}}"#,
        )
        .unwrap();

        assert_eq!(config.n_recommendations, 8);
        assert_eq!(config.similarity_weights.content, 0.6);
        assert_eq!(config.similarity_weights.genre, 0.4);
        assert_eq!(config.min_rating, 6.0);
    }

    #[test]
    fn test_overrides() {
        let config = RecommenderConfig::default()
            .apply_overrides(vars(&[
                (ENV_N_RECOMMENDATIONS, "12"),
                (ENV_MIN_RATING, " 7.5 "),
                (ENV_MIN_SIMILARITY_SCORE, ""),
                ("UNRELATED_SETTING", "ignored"),
            ]))
            .unwrap();

        assert_eq!(config.n_recommendations, 12);
        assert_eq!(config.min_rating, 7.5);
        assert_eq!(config.min_similarity_score, 0.1);
    }

    #[test]
    fn test_invalid_override() {
        let err = RecommenderConfig::default()
            .apply_overrides(vars(&[(ENV_N_RECOMMENDATIONS, "lots")]))
            .unwrap_err();
        assert!(matches!(err, RecommendError::InvalidOverride(ref reason) if reason.contains("lots")));
    }

    #[test]
    fn test_env_file_overrides_defaults() {
        let env_file =
            std::env::temp_dir().join(format!("movie-recs-config-{}.env", std::process::id()));
        fs::write(&env_file, format!("{}=9\n", ENV_N_RECOMMENDATIONS)).unwrap();

        let config = RecommenderConfig::load_with_env_file(None, &env_file);
        fs::remove_file(&env_file).unwrap();

        assert_eq!(config.unwrap().n_recommendations, 9);
    }

    #[test]
    fn test_missing_env_file() {
        let err = RecommenderConfig::load_with_env_file(None, Path::new("no/such/.env"))
            .unwrap_err();
        assert!(matches!(err, RecommendError::Config { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = RecommenderConfig::from_file(Path::new("no/such/config.json")).unwrap_err();
        assert!(matches!(err, RecommendError::Config { .. }));
    }
}

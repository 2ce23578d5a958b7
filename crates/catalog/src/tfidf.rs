//! TF-IDF model over movie overviews.
//!
//! ## Algorithm
//! 1. Analyze every document into unigram and bigram terms (see `text.rs`)
//! 2. Count corpus term frequency and document frequency per term
//! 3. Keep the `max_features` most frequent terms (ties: alphabetical)
//! 4. idf(t) = ln((1 + n) / (1 + df(t))) + 1
//! 5. Each document vector = raw count x idf, then L2-normalised
//!
//! Because vectors are unit length, cosine similarity is a sparse dot product.

use crate::text;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Settings for fitting the vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFeatureConfig {
    /// Vocabulary cap (most frequent terms across the corpus win)
    pub max_features: usize,
    /// Longest n-gram to extract; 2 means unigrams and bigrams
    pub ngram_max: usize,
}

impl Default for TextFeatureConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            ngram_max: 2,
        }
    }
}

impl TextFeatureConfig {
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_ngram_max(mut self, ngram_max: usize) -> Self {
        self.ngram_max = ngram_max.max(1);
        self
    }
}

/// Sparse, unit-length term-weight vector for one document.
///
/// Entries are `(term index, weight)` sorted by term index. A document whose
/// text contains no vocabulary term has no entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(u32, f32)>,
}

impl FeatureVector {
    /// Build from raw term counts, weighting by idf and normalising
    fn from_counts(counts: BTreeMap<u32, u32>, idf: &[f32]) -> Self {
        let mut entries: Vec<(u32, f32)> = counts
            .into_iter()
            .map(|(idx, count)| (idx, count as f32 * idf[idx as usize]))
            .collect();

        let norm = entries
            .iter()
            .map(|&(_, w)| (w as f64) * (w as f64))
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for entry in &mut entries {
                entry.1 = (entry.1 as f64 / norm) as f32;
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(u32, f32)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cosine similarity in [0, 1]; 0.0 if either vector is empty
    pub fn cosine(&self, other: &FeatureVector) -> f32 {
        if self.is_zero() || other.is_zero() {
            return 0.0;
        }

        // Merge walk over two index-sorted lists
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0_f64;
        while i < self.entries.len() && j < other.entries.len() {
            let (ia, wa) = self.entries[i];
            let (ib, wb) = other.entries[j];
            match ia.cmp(&ib) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += wa as f64 * wb as f64;
                    i += 1;
                    j += 1;
                }
            }
        }
        (dot as f32).clamp(0.0, 1.0)
    }
}

/// Vocabulary, idf weights and one vector per fitted document.
#[derive(Debug, Clone)]
pub struct TextFeatureModel {
    vocabulary: HashMap<String, u32>,
    idf: Vec<f32>,
    vectors: Vec<FeatureVector>,
}

impl TextFeatureModel {
    /// Fit the vocabulary on `documents` and vectorize each of them.
    ///
    /// Vector `i` belongs to `documents[i]`. A corpus made only of stop words
    /// fits an empty vocabulary; every vector is then empty.
    pub fn fit<S>(documents: &[S], config: &TextFeatureConfig) -> Self
    where
        S: AsRef<str> + Sync,
    {
        let n_docs = documents.len();
        let ngram_max = config.ngram_max.max(1);

        let analyzed: Vec<Vec<String>> = documents
            .par_iter()
            .map(|doc| text::analyze(doc.as_ref(), ngram_max))
            .collect();

        // term -> (corpus frequency, document frequency)
        let counts: HashMap<&str, (usize, usize)> = analyzed
            .par_iter()
            .fold(HashMap::new, |mut local: HashMap<&str, (usize, usize)>, terms| {
                let mut seen: HashSet<&str> = HashSet::new();
                for term in terms {
                    let entry = local.entry(term.as_str()).or_insert((0, 0));
                    entry.0 += 1;
                    if seen.insert(term.as_str()) {
                        entry.1 += 1;
                    }
                }
                local
            })
            .reduce(HashMap::new, |mut acc, local| {
                for (term, (tf, df)) in local {
                    let entry = acc.entry(term).or_insert((0, 0));
                    entry.0 += tf;
                    entry.1 += df;
                }
                acc
            });

        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .map(|(term, (tf, df))| (term, tf, df))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(config.max_features);
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        // Indices follow alphabetical term order
        let vocabulary: HashMap<String, u32> = ranked
            .iter()
            .enumerate()
            .map(|(idx, (term, _, _))| (term.to_string(), idx as u32))
            .collect();
        let idf: Vec<f32> = ranked
            .iter()
            .map(|&(_, _, df)| smoothed_idf(n_docs, df))
            .collect();

        let vectors: Vec<FeatureVector> = analyzed
            .par_iter()
            .map(|doc_terms| vectorize(doc_terms, &vocabulary, &idf))
            .collect();

        debug!(
            "Fitted TF-IDF model: {} documents, {} terms",
            n_docs,
            vocabulary.len()
        );

        Self {
            vocabulary,
            idf,
            vectors,
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn term_index(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_index(term).map(|idx| self.idf[idx as usize])
    }

    /// Number of fitted documents
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector of the document at position `doc`
    pub fn vector(&self, doc: usize) -> Option<&FeatureVector> {
        self.vectors.get(doc)
    }

    /// Cosine similarity between two fitted documents; 0.0 if out of range
    pub fn similarity(&self, a: usize, b: usize) -> f32 {
        match (self.vectors.get(a), self.vectors.get(b)) {
            (Some(va), Some(vb)) => va.cosine(vb),
            _ => 0.0,
        }
    }
}

fn smoothed_idf(n_docs: usize, df: usize) -> f32 {
    (((1 + n_docs) as f64 / (1 + df) as f64).ln() + 1.0) as f32
}

fn vectorize(terms: &[String], vocabulary: &HashMap<String, u32>, idf: &[f32]) -> FeatureVector {
    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    for term in terms {
        if let Some(&idx) = vocabulary.get(term) {
            *counts.entry(idx).or_insert(0) += 1;
        }
    }
    FeatureVector::from_counts(counts, idf)
}

//! Emotion labels and the genres each one maps to.
//!
//! The table is closed: every label parses to one of four `Emotion`s, and
//! anything else is an `UnknownEmotionError` that lists the accepted labels.
//! English and French labels are both accepted.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Accepted labels, sorted
const LABELS: &[(&str, Emotion)] = &[
    ("anger", Emotion::Anger),
    ("colère", Emotion::Anger),
    ("fear", Emotion::Fear),
    ("joie", Emotion::Joy),
    ("joy", Emotion::Joy),
    ("peur", Emotion::Fear),
    ("sadness", Emotion::Sadness),
    ("tristesse", Emotion::Sadness),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Emotion {
    Joy,
    Anger,
    Sadness,
    Fear,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [Emotion::Joy, Emotion::Anger, Emotion::Sadness, Emotion::Fear];

    /// Parse a user-supplied label (surrounding whitespace and case ignored)
    pub fn parse(label: &str) -> Result<Self, UnknownEmotionError> {
        let key = label.trim().to_lowercase();
        // Keyboards without accents
        let key = if key == "colere" { "colère".to_string() } else { key };

        LABELS
            .iter()
            .find(|(l, _)| *l == key)
            .map(|&(_, emotion)| emotion)
            .ok_or_else(|| UnknownEmotionError {
                label: label.to_string(),
            })
    }

    /// Genres this emotion maps to
    pub fn genres(self) -> &'static [&'static str] {
        match self {
            Emotion::Joy => &["Comedy", "Adventure", "Family", "Animation"],
            Emotion::Anger => &["Action", "Thriller", "Crime"],
            Emotion::Sadness => &["Drama", "Romance"],
            Emotion::Fear => &["Horror", "Thriller", "Mystery"],
        }
    }

    pub fn genre_set(self) -> BTreeSet<String> {
        self.genres().iter().map(|g| g.to_string()).collect()
    }

    /// English label
    pub fn label(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Anger => "anger",
            Emotion::Sadness => "sadness",
            Emotion::Fear => "fear",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Emotion {
    type Err = UnknownEmotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::parse(s)
    }
}

/// Raised for a label outside the emotion table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown emotion '{label}'. Available emotions: {}", available_emotions().join(", "))]
pub struct UnknownEmotionError {
    pub label: String,
}

/// Every accepted label, sorted
pub fn available_emotions() -> Vec<&'static str> {
    LABELS.iter().map(|(label, _)| *label).collect()
}

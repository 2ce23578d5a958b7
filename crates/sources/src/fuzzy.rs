//! Token-sort fuzzy string ratio.
//!
//! ## Algorithm
//! 1. Normalise: lowercase, every non-alphanumeric char becomes a space, trim
//! 2. Split on whitespace, sort the tokens, join with single spaces
//! 3. Edit distance `d` with insert/delete cost 1 and substitution cost 2
//! 4. ratio = (len_a + len_b - d) / (len_a + len_b), scaled to 0-100 and rounded
//!
//! Lengths are counted in chars, so accented titles compare letter by letter.

/// Lowercase, replace non-alphanumerics with spaces and trim
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    mapped.trim().to_string()
}

/// Normalised tokens, sorted alphabetically and joined with single spaces
///
/// Example: "The Matrix: Reloaded" -> "matrix reloaded the"
pub fn token_sort_key(text: &str) -> String {
    let normalized = normalize(text);
    let mut tokens: Vec<&str> = normalized.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Edit distance where a substitution costs as much as a delete plus an insert
pub fn indel_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + if ca == cb { 0 } else { 2 };
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Similarity ratio of two already-prepared strings, 0-100.
///
/// Two empty strings score 0: an empty title never matches anything.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let distance = indel_distance(&a, &b);
    let similarity = (total - distance) as f64 / total as f64;
    (similarity * 100.0).round() as u8
}

/// Token-sort ratio of two raw strings, 0-100
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&token_sort_key(a), &token_sort_key(b))
}

//! Final ordering of scored candidates.
//!
//! ## Algorithm
//! 1. Drop candidates missing from the catalog
//! 2. Sort by score desc, then vote count desc, then title asc, then id asc
//! 3. Keep the first `n`
//!
//! Scores are compared with `total_cmp`, so the order is total even if a
//! NaN slips through.

use catalog::{Catalog, MovieRecord};
use sources::Candidate;
use std::cmp::Ordering;

/// Sort and truncate candidates, pairing each with its catalog record
pub fn rank_and_select<'a>(
    candidates: Vec<Candidate>,
    catalog: &'a Catalog,
    n: usize,
) -> Vec<(Candidate, &'a MovieRecord)> {
    let mut ranked: Vec<(Candidate, &MovieRecord)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let movie = catalog.get(candidate.movie_id)?;
            Some((candidate, movie))
        })
        .collect();

    ranked.sort_by(|a, b| compare_ranked(&a.0, a.1, &b.0, b.1));
    ranked.truncate(n);
    ranked
}

fn compare_ranked(a: &Candidate, ma: &MovieRecord, b: &Candidate, mb: &MovieRecord) -> Ordering {
    b.base_score
        .total_cmp(&a.base_score)
        .then_with(|| mb.vote_count.total_cmp(&ma.vote_count))
        .then_with(|| ma.title.cmp(&mb.title))
        .then_with(|| ma.id.cmp(&mb.id))
}

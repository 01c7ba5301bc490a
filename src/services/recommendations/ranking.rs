use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::models::{CandidateItem, PreferenceProfile};

pub const BASE_SCORE: f64 = 1.0;
/// Added once per profile genre found in the candidate's categories
pub const GENRE_MATCH_BONUS: f64 = 2.0;
/// Added once per profile author found in the candidate's authors
pub const AUTHOR_MATCH_BONUS: f64 = 2.5;
/// Added when the user has not rated the candidate yet
pub const NOVELTY_BONUS: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub item: CandidateItem,
    pub score: f64,
}

/// Case-insensitive substring match of `needle` against any of `values`
fn matches_any(needle: &str, values: &[String]) -> bool {
    let needle = needle.to_lowercase();
    values
        .iter()
        .any(|value| value.to_lowercase().contains(&needle))
}

/// Scores one candidate against the profile
///
/// Genre and author bonuses stack per matching profile entry; there is no cap.
pub fn score_candidate(
    book_id: &str,
    item: &CandidateItem,
    profile: &PreferenceProfile,
    already_rated: &HashSet<String>,
) -> f64 {
    let genre_matches = profile
        .top_genres
        .iter()
        .filter(|genre| matches_any(genre, &item.categories))
        .count();
    let author_matches = profile
        .top_authors
        .iter()
        .filter(|author| matches_any(author, &item.authors))
        .count();

    let mut score = BASE_SCORE
        + GENRE_MATCH_BONUS * genre_matches as f64
        + AUTHOR_MATCH_BONUS * author_matches as f64;

    if !already_rated.contains(book_id) {
        score += NOVELTY_BONUS;
    }

    score
}

/// Scores the pool and keeps the best occurrence of each book id
///
/// Candidates without an id are dropped. A later duplicate replaces the kept
/// one only with a strictly higher score, and takes over its position, so the
/// result is ordered by each id's first appearance in the pool.
pub fn score_and_dedup(
    candidates: Vec<CandidateItem>,
    profile: &PreferenceProfile,
    already_rated: &HashSet<String>,
) -> Vec<ScoredCandidate> {
    let mut best: Vec<ScoredCandidate> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut discarded = 0usize;

    for item in candidates {
        let Some(book_id) = item.id().map(str::to_owned) else {
            discarded += 1;
            continue;
        };

        let score = score_candidate(&book_id, &item, profile, already_rated);

        match positions.get(&book_id) {
            Some(&pos) => {
                if score > best[pos].score {
                    best[pos] = ScoredCandidate { item, score };
                }
            }
            None => {
                positions.insert(book_id, best.len());
                best.push(ScoredCandidate { item, score });
            }
        }
    }

    if discarded > 0 {
        tracing::debug!(discarded, "Dropped candidates without a book id");
    }

    best
}

/// Turns the raw candidate pool into the final recommendation list
///
/// Highest score first; equal scores keep pool order. At most `limit` items.
pub fn rank_candidates(
    candidates: Vec<CandidateItem>,
    profile: &PreferenceProfile,
    already_rated: &HashSet<String>,
    limit: usize,
) -> Vec<CandidateItem> {
    let mut scored = score_and_dedup(candidates, profile, already_rated);

    // sort_by is stable
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(limit);

    scored.into_iter().map(|candidate| candidate.item).collect()
}

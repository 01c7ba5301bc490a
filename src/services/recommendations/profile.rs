use std::cmp::Ordering;
use std::collections::HashMap;

use crate::{
    db::RatingStore,
    error::AppResult,
    models::{PreferenceProfile, RatingRecord},
};

/// Accumulated rating weight per lower-cased key, in first-seen order
#[derive(Debug, Default)]
struct WeightedCounter {
    positions: HashMap<String, usize>,
    entries: Vec<(String, f64)>,
}

impl WeightedCounter {
    fn add(&mut self, raw: &str, weight: f64) {
        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            return;
        }

        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1 += weight,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, weight));
            }
        }
    }

    /// Heaviest `n` keys; equal weights keep first-seen order
    fn top(mut self, n: usize) -> Vec<String> {
        self.entries
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        self.entries.into_iter().take(n).map(|(key, _)| key).collect()
    }
}

/// Folds a rating history into a preference profile
///
/// Every genre and author on a rated book gains that book's rating as weight,
/// so a 5-star read counts five times as much as a 1-star one. Records without
/// genre or author metadata simply contribute nothing.
pub fn build_profile(ratings: &[RatingRecord], top_n: usize) -> PreferenceProfile {
    let mut genres = WeightedCounter::default();
    let mut authors = WeightedCounter::default();

    for record in ratings {
        for genre in &record.genres {
            genres.add(genre, record.rating);
        }
        for author in &record.authors {
            authors.add(author, record.rating);
        }
    }

    PreferenceProfile {
        top_genres: genres.top(top_n),
        top_authors: authors.top(top_n),
    }
}

/// Reads the user's full rating history and derives their profile
///
/// Store failures propagate: without the history there is no profile.
pub async fn extract_profile(
    store: &dyn RatingStore,
    user_id: &str,
    top_n: usize,
) -> AppResult<PreferenceProfile> {
    let ratings = store.list_ratings(user_id).await?;
    let profile = build_profile(&ratings, top_n);

    tracing::debug!(
        user_id = %user_id,
        ratings = ratings.len(),
        top_genres = ?profile.top_genres,
        top_authors = ?profile.top_authors,
        "Preference profile built"
    );

    Ok(profile)
}

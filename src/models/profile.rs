use serde::{Deserialize, Serialize};

/// A user's strongest genre and author signals, derived from their ratings
///
/// Entries are lower-cased and ordered by accumulated rating weight, highest
/// first. Never persisted; rebuilt on every recommendation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PreferenceProfile {
    pub top_genres: Vec<String>,
    pub top_authors: Vec<String>,
}

impl PreferenceProfile {
    /// True when the history produced no usable genre or author signal
    pub fn is_empty(&self) -> bool {
        self.top_genres.is_empty() && self.top_authors.is_empty()
    }
}

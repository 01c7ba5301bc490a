use std::sync::Arc;
use std::time::Instant;

use crate::{
    config::Config,
    db::RatingStore,
    error::{AppError, AppResult},
    models::{CandidateItem, PreferenceProfile},
    services::providers::SearchProvider,
};

pub mod profile;
pub mod ranking;
pub mod retrieval;

pub use profile::{build_profile, extract_profile};
pub use ranking::{rank_candidates, score_candidate, ScoredCandidate};
pub use retrieval::{plan_queries, retrieve_candidates, CandidateQuery, RetrievalSettings};

/// Tuning for the recommendation pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct RecommenderSettings {
    /// Genres and authors kept per profile dimension
    pub profile_top_n: usize,
    pub retrieval: RetrievalSettings,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            profile_top_n: 3,
            retrieval: RetrievalSettings::default(),
        }
    }
}

impl From<&Config> for RecommenderSettings {
    fn from(config: &Config) -> Self {
        Self {
            profile_top_n: config.profile_top_n.max(1),
            retrieval: RetrievalSettings {
                per_query_limit: config.per_query_limit,
                fallback_subjects: config.fallback_subjects.clone(),
                fallback_query_limit: config.fallback_query_limit,
            },
        }
    }
}

/// Personalized and non-personalized book recommendations
///
/// Personalized recommendations run the full pipeline: the user's rating
/// history becomes a preference profile, the profile drives concurrent
/// searches, and the pooled results are scored, deduplicated and ranked.
pub struct Recommender {
    ratings: Arc<dyn RatingStore>,
    provider: Arc<dyn SearchProvider>,
    settings: RecommenderSettings,
}

impl Recommender {
    pub fn new(
        ratings: Arc<dyn RatingStore>,
        provider: Arc<dyn SearchProvider>,
        settings: RecommenderSettings,
    ) -> Self {
        Self {
            ratings,
            provider,
            settings,
        }
    }

    /// The profile the next recommendation for this user would use
    pub async fn profile_for_user(&self, user_id: &str) -> AppResult<PreferenceProfile> {
        require_non_empty("user_id", user_id)?;
        extract_profile(self.ratings.as_ref(), user_id, self.settings.profile_top_n).await
    }

    /// Ranked recommendations for one user, at most `limit` long
    ///
    /// Fails only on invalid input or when the rating store is unavailable;
    /// search failures shrink the candidate pool instead.
    pub async fn recommend_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> AppResult<Vec<CandidateItem>> {
        require_non_empty("user_id", user_id)?;
        validate_limit(limit)?;

        let start = Instant::now();

        let profile =
            extract_profile(self.ratings.as_ref(), user_id, self.settings.profile_top_n).await?;

        // Already-rated ids do not depend on the search results
        let (candidates, already_rated) = tokio::join!(
            retrieve_candidates(self.provider.clone(), &profile, &self.settings.retrieval),
            self.ratings.list_rated_item_ids(user_id),
        );
        let already_rated = already_rated?;

        let candidate_count = candidates.len();
        let recommendations = rank_candidates(candidates, &profile, &already_rated, limit);

        tracing::info!(
            user_id = %user_id,
            candidates = candidate_count,
            rated = already_rated.len(),
            returned = recommendations.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Recommendations generated"
        );

        Ok(recommendations)
    }

    /// Provider results for a genre, unscored
    pub async fn recommend_by_genre(&self, genre: &str, limit: usize) -> AppResult<Vec<CandidateItem>> {
        require_non_empty("genre", genre)?;
        validate_limit(limit)?;

        Ok(or_empty(
            "genre",
            genre,
            self.provider.search_by_genre(genre.trim(), limit).await,
        ))
    }

    /// Provider results for an author, unscored
    pub async fn recommend_by_author(
        &self,
        author: &str,
        limit: usize,
    ) -> AppResult<Vec<CandidateItem>> {
        require_non_empty("author", author)?;
        validate_limit(limit)?;

        Ok(or_empty(
            "author",
            author,
            self.provider.search_by_author(author.trim(), limit).await,
        ))
    }

    /// Free-text search, unscored
    pub async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<CandidateItem>> {
        require_non_empty("q", query)?;
        validate_limit(limit)?;

        Ok(or_empty(
            "keywords",
            query,
            self.provider.search_by_keywords(query.trim(), limit).await,
        ))
    }
}

/// Provider failures on pass-through lookups degrade to no results
fn or_empty(
    kind: &str,
    value: &str,
    result: AppResult<Vec<CandidateItem>>,
) -> Vec<CandidateItem> {
    result.unwrap_or_else(|e| {
        tracing::warn!(kind, value = %value, error = %e, "Search failed, returning no results");
        Vec::new()
    })
}

fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(())
}

fn validate_limit(limit: usize) -> AppResult<()> {
    if limit == 0 {
        return Err(AppError::InvalidInput(
            "limit must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

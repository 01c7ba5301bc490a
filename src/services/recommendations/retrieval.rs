use std::fmt::Display;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{CandidateItem, PreferenceProfile},
    services::providers::SearchProvider,
};

/// Subjects searched when neither the profile nor the configuration yields any
pub const DEFAULT_FALLBACK_SUBJECTS: [&str; 2] = ["fiction", "nonfiction"];

/// Knobs for turning a profile into search queries
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalSettings {
    /// Result cap for each genre or author query
    pub per_query_limit: usize,
    /// Subjects searched for users without a usable profile
    pub fallback_subjects: Vec<String>,
    /// Result cap for each fallback query
    pub fallback_query_limit: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            per_query_limit: 10,
            fallback_subjects: DEFAULT_FALLBACK_SUBJECTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fallback_query_limit: 15,
        }
    }
}

/// One search issued during candidate retrieval
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateQuery {
    Genre { genre: String, max_results: usize },
    Author { author: String, max_results: usize },
}

impl Display for CandidateQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateQuery::Genre { genre, .. } => write!(f, "genre:{}", genre),
            CandidateQuery::Author { author, .. } => write!(f, "author:{}", author),
        }
    }
}

impl CandidateQuery {
    async fn run(&self, provider: &dyn SearchProvider) -> AppResult<Vec<CandidateItem>> {
        match self {
            CandidateQuery::Genre { genre, max_results } => {
                provider.search_by_genre(genre, *max_results).await
            }
            CandidateQuery::Author {
                author,
                max_results,
            } => provider.search_by_author(author, *max_results).await,
        }
    }
}

/// Plans one query per profile genre, then one per profile author
///
/// An empty profile falls back to subject queries, so the plan is never empty.
pub fn plan_queries(profile: &PreferenceProfile, settings: &RetrievalSettings) -> Vec<CandidateQuery> {
    let mut queries: Vec<CandidateQuery> = profile
        .top_genres
        .iter()
        .map(|genre| CandidateQuery::Genre {
            genre: genre.clone(),
            max_results: settings.per_query_limit,
        })
        .chain(profile.top_authors.iter().map(|author| CandidateQuery::Author {
            author: author.clone(),
            max_results: settings.per_query_limit,
        }))
        .collect();

    if queries.is_empty() {
        let mut subjects: Vec<String> = settings
            .fallback_subjects
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if subjects.is_empty() {
            subjects = DEFAULT_FALLBACK_SUBJECTS.iter().map(|s| s.to_string()).collect();
        }

        queries = subjects
            .into_iter()
            .map(|genre| CandidateQuery::Genre {
                genre,
                max_results: settings.fallback_query_limit,
            })
            .collect();
    }

    queries
}

/// Runs every query concurrently and pools their results
///
/// Each query is its own task. All tasks are awaited before returning, in
/// submission order, so the pool order depends only on the plan. A query
/// that errors or panics contributes nothing and does not affect the others.
pub async fn fan_out(
    provider: Arc<dyn SearchProvider>,
    queries: Vec<CandidateQuery>,
) -> Vec<CandidateItem> {
    let total = queries.len();
    let tasks: Vec<_> = queries
        .into_iter()
        .map(|query| {
            let provider = provider.clone();
            let label = query.to_string();
            let task = tokio::spawn(async move { query.run(provider.as_ref()).await });
            (label, task)
        })
        .collect();

    let mut pool = Vec::new();
    let mut failed = 0usize;

    for (label, task) in tasks {
        match task.await {
            Ok(Ok(items)) => pool.extend(items),
            Ok(Err(e)) => {
                failed += 1;
                tracing::warn!(query = %label, error = %e, "Candidate query failed, skipping");
            }
            Err(e) => {
                failed += 1;
                tracing::error!(query = %label, error = %e, "Candidate query task join error");
            }
        }
    }

    if failed > 0 {
        tracing::warn!(
            success_count = total - failed,
            error_count = failed,
            "Partial candidate retrieval failure"
        );
    }

    pool
}

/// Plans and runs the candidate queries for a profile
pub async fn retrieve_candidates(
    provider: Arc<dyn SearchProvider>,
    profile: &PreferenceProfile,
    settings: &RetrievalSettings,
) -> Vec<CandidateItem> {
    let queries = plan_queries(profile, settings);
    let query_count = queries.len();
    let pool = fan_out(provider, queries).await;

    tracing::info!(
        queries = query_count,
        candidates = pool.len(),
        fallback = profile.is_empty(),
        "Candidate retrieval completed"
    );

    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, services::providers::MockSearchProvider};

    fn book(id: &str) -> CandidateItem {
        CandidateItem {
            book_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn ids(items: &[CandidateItem]) -> Vec<&str> {
        items.iter().filter_map(|item| item.id()).collect()
    }

    fn profile(genres: &[&str], authors: &[&str]) -> PreferenceProfile {
        PreferenceProfile {
            top_genres: genres.iter().map(|g| g.to_string()).collect(),
            top_authors: authors.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_plan_genres_before_authors() {
        let queries = plan_queries(
            &profile(&["fiction", "history"], &["jane doe"]),
            &RetrievalSettings::default(),
        );

        assert_eq!(
            queries,
            vec![
                CandidateQuery::Genre {
                    genre: "fiction".to_string(),
                    max_results: 10
                },
                CandidateQuery::Genre {
                    genre: "history".to_string(),
                    max_results: 10
                },
                CandidateQuery::Author {
                    author: "jane doe".to_string(),
                    max_results: 10
                },
            ]
        );
    }

    #[test]
    fn test_empty_profile_uses_fallback_subjects() {
        let settings = RetrievalSettings {
            per_query_limit: 10,
            fallback_subjects: vec!["poetry".to_string(), " ".to_string()],
            fallback_query_limit: 15,
        };

        let queries = plan_queries(&PreferenceProfile::default(), &settings);
        assert_eq!(
            queries,
            vec![CandidateQuery::Genre {
                genre: "poetry".to_string(),
                max_results: 15
            }]
        );
    }

    #[test]
    fn test_plan_is_never_empty() {
        let settings = RetrievalSettings {
            fallback_subjects: Vec::new(),
            ..Default::default()
        };

        let queries = plan_queries(&PreferenceProfile::default(), &settings);
        assert_eq!(queries.len(), DEFAULT_FALLBACK_SUBJECTS.len());
    }

    #[test]
    fn test_query_display() {
        let query = CandidateQuery::Author {
            author: "jane doe".to_string(),
            max_results: 10,
        };
        assert_eq!(query.to_string(), "author:jane doe");
    }

    #[tokio::test]
    async fn test_zero_ratings_issue_only_fallback_queries() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search_by_genre()
            .withf(|genre, max| genre == "fiction" && *max == 15)
            .times(1)
            .returning(|_, _| Ok(vec![book("F1")]));
        provider
            .expect_search_by_genre()
            .withf(|genre, max| genre == "nonfiction" && *max == 15)
            .times(1)
            .returning(|_, _| Ok(vec![book("N1")]));
        provider.expect_search_by_author().times(0);

        let pool = retrieve_candidates(
            Arc::new(provider),
            &PreferenceProfile::default(),
            &RetrievalSettings::default(),
        )
        .await;

        assert_eq!(ids(&pool), vec!["F1", "N1"]);
    }

    #[tokio::test]
    async fn test_failed_query_yields_empty_contribution() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search_by_genre()
            .returning(|_, _| Ok(vec![book("G1"), book("G2")]));
        provider
            .expect_search_by_author()
            .returning(|_, _| Err(AppError::ExternalApi("status 503".to_string())));

        let pool = retrieve_candidates(
            Arc::new(provider),
            &profile(&["fiction"], &["jane doe"]),
            &RetrievalSettings::default(),
        )
        .await;

        assert_eq!(ids(&pool), vec!["G1", "G2"]);
    }

    /// Panics on `subject:broken`, answers everything else with one book
    struct FlakyProvider;

    #[async_trait::async_trait]
    impl SearchProvider for FlakyProvider {
        async fn search_by_keywords(
            &self,
            query: &str,
            _max_results: usize,
        ) -> AppResult<Vec<CandidateItem>> {
            if query == "subject:broken" {
                panic!("provider bug");
            }
            Ok(vec![book("G1")])
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn test_panicking_query_does_not_abort_siblings() {
        let pool = retrieve_candidates(
            Arc::new(FlakyProvider),
            &profile(&["broken", "fiction"], &[]),
            &RetrievalSettings::default(),
        )
        .await;

        assert_eq!(ids(&pool), vec!["G1"]);
    }

    /// Holds every query at a barrier until all of them have arrived
    struct RendezvousProvider {
        barrier: tokio::sync::Barrier,
    }

    #[async_trait::async_trait]
    impl SearchProvider for RendezvousProvider {
        async fn search_by_keywords(
            &self,
            query: &str,
            _max_results: usize,
        ) -> AppResult<Vec<CandidateItem>> {
            self.barrier.wait().await;
            Ok(vec![book(query)])
        }

        fn name(&self) -> &'static str {
            "rendezvous"
        }
    }

    #[tokio::test]
    async fn test_queries_are_in_flight_together() {
        let provider = Arc::new(RendezvousProvider {
            barrier: tokio::sync::Barrier::new(5),
        });

        // Awaiting queries one at a time would never get past the barrier
        let pool = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            retrieve_candidates(
                provider,
                &profile(&["a", "b", "c"], &["x", "y"]),
                &RetrievalSettings::default(),
            ),
        )
        .await
        .expect("queries were not issued concurrently");

        assert_eq!(
            ids(&pool),
            vec!["subject:a", "subject:b", "subject:c", "inauthor:x", "inauthor:y"]
        );
    }

    #[tokio::test]
    async fn test_pool_keeps_duplicates_in_submission_order() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search_by_genre()
            .returning(|_, _| Ok(vec![book("C3"), book("G1")]));
        provider
            .expect_search_by_author()
            .returning(|_, _| Ok(vec![book("C3")]));

        let pool = retrieve_candidates(
            Arc::new(provider),
            &profile(&["fiction"], &["jane doe"]),
            &RetrievalSettings::default(),
        )
        .await;

        assert_eq!(ids(&pool), vec!["C3", "G1", "C3"]);
    }

    #[tokio::test]
    async fn test_all_queries_failing_gives_empty_pool() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search_by_genre()
            .returning(|_, _| Err(AppError::ExternalApi("timeout".to_string())));

        let pool = fan_out(
            Arc::new(provider),
            vec![CandidateQuery::Genre {
                genre: "fiction".to_string(),
                max_results: 10,
            }],
        )
        .await;

        assert!(pool.is_empty());
    }
}

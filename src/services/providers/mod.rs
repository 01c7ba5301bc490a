/// Book search provider abstraction
///
/// The recommendation engine never talks to a search backend directly. Each
/// provider implements free-text search; genre and author searches default to
/// scoped keyword queries, which providers may override if they have native
/// endpoints for them.
use crate::{error::AppResult, models::CandidateItem};

pub mod google_books;

pub use google_books::GoogleBooksProvider;

/// Trait for book search providers
///
/// Results are unordered and may include items without an id. Errors are
/// returned as-is; callers that need partial-failure tolerance wrap them.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Free-text search
    async fn search_by_keywords(
        &self,
        query: &str,
        max_results: usize,
    ) -> AppResult<Vec<CandidateItem>>;

    /// Books filed under a subject/genre
    async fn search_by_genre(
        &self,
        genre: &str,
        max_results: usize,
    ) -> AppResult<Vec<CandidateItem>> {
        self.search_by_keywords(&format!("subject:{}", genre), max_results)
            .await
    }

    /// Books written by an author
    async fn search_by_author(
        &self,
        author: &str,
        max_results: usize,
    ) -> AppResult<Vec<CandidateItem>> {
        self.search_by_keywords(&format!("inauthor:{}", author), max_results)
            .await
    }

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

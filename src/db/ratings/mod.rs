/// Rating persistence abstraction
///
/// The recommendation engine only reads ratings; writes come from the rating
/// endpoints. Backends are pluggable so the service can run against Postgres
/// in production and an in-process map in tests and local development.
use std::collections::HashSet;

use crate::{error::AppResult, models::RatingRecord};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRatingStore;
pub use postgres::PgRatingStore;

/// Trait for rating storage backends
///
/// Implementations must keep at most one rating per (user, book) pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingStore: Send + Sync {
    /// All ratings of a user, most recent first
    async fn list_ratings(&self, user_id: &str) -> AppResult<Vec<RatingRecord>>;

    /// Ids of every book the user has rated
    async fn list_rated_item_ids(&self, user_id: &str) -> AppResult<HashSet<String>>;

    /// Creates the rating or replaces the existing one for the same book
    async fn upsert_rating(&self, record: RatingRecord) -> AppResult<()>;

    /// Removes a rating. Returns false when there was nothing to remove.
    async fn delete_rating(&self, user_id: &str, book_id: &str) -> AppResult<bool>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

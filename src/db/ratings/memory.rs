use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{db::ratings::RatingStore, error::AppResult, models::RatingRecord};

/// Process-local rating store
///
/// Each user's ratings are kept in write order so that listing is
/// deterministic when timestamps collide.
#[derive(Clone, Default)]
pub struct InMemoryRatingStore {
    inner: Arc<RwLock<HashMap<String, Vec<RatingRecord>>>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RatingStore for InMemoryRatingStore {
    async fn list_ratings(&self, user_id: &str) -> AppResult<Vec<RatingRecord>> {
        let inner = self.inner.read().await;
        let mut ratings: Vec<RatingRecord> = inner
            .get(user_id)
            .map(|records| records.iter().rev().cloned().collect())
            .unwrap_or_default();

        ratings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(ratings)
    }

    async fn list_rated_item_ids(&self, user_id: &str) -> AppResult<HashSet<String>> {
        let inner = self.inner.read().await;
        Ok(inner
            .get(user_id)
            .map(|records| records.iter().map(|r| r.book_id.clone()).collect())
            .unwrap_or_default())
    }

    async fn upsert_rating(&self, record: RatingRecord) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let records = inner.entry(record.user_id.clone()).or_default();
        records.retain(|existing| existing.book_id != record.book_id);
        records.push(record);
        Ok(())
    }

    async fn delete_rating(&self, user_id: &str, book_id: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let Some(records) = inner.get_mut(user_id) else {
            return Ok(false);
        };

        let before = records.len();
        records.retain(|existing| existing.book_id != book_id);
        Ok(records.len() < before)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

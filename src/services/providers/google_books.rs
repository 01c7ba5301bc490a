/// Google Books provider
///
/// Uses the public volumes search endpoint (`GET /volumes?q=...`), which
/// understands `subject:` and `inauthor:` query prefixes. The API key is
/// optional; without it requests count against the anonymous quota.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ApiVolumesResponse, CandidateItem},
    services::providers::SearchProvider,
};

/// Largest `maxResults` the volumes endpoint accepts
pub const MAX_RESULTS_PER_REQUEST: usize = 40;

#[derive(Clone)]
pub struct GoogleBooksProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl GoogleBooksProvider {
    /// Builds a provider whose every request is bounded by `timeout`
    pub fn new(
        api_key: &str,
        api_url: String,
        timeout: Duration,
        cache: Option<Cache>,
        cache_ttl: u64,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key: usable_api_key(api_key),
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl,
        })
    }

    async fn fetch_volumes(&self, query: &str, max_results: usize) -> AppResult<Vec<CandidateItem>> {
        let url = format!("{}/volumes", self.api_url);
        let mut params = vec![
            ("q", query.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        let response = self.http_client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Google Books returned status {}: {}",
                status, body
            )));
        }

        let volumes: ApiVolumesResponse = response.json().await?;
        let items: Vec<CandidateItem> = volumes.items.into_iter().map(CandidateItem::from).collect();

        tracing::info!(
            query = %query,
            results = items.len(),
            provider = "google_books",
            "Book search completed"
        );

        Ok(items)
    }
}

/// Drops blank keys and unfilled `.env` placeholders such as `<your-key>`
fn usable_api_key(raw: &str) -> Option<String> {
    let key = raw.trim();
    if key.is_empty() || key.starts_with('<') || key.to_lowercase().contains("replace_with") {
        None
    } else {
        Some(key.to_string())
    }
}

#[async_trait::async_trait]
impl SearchProvider for GoogleBooksProvider {
    async fn search_by_keywords(
        &self,
        query: &str,
        max_results: usize,
    ) -> AppResult<Vec<CandidateItem>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let max_results = max_results.clamp(1, MAX_RESULTS_PER_REQUEST);

        match &self.cache {
            Some(cache) => {
                let key = CacheKey::BookSearch {
                    query: query.to_string(),
                    max_results,
                };
                cached!(
                    cache,
                    key,
                    self.cache_ttl,
                    self.fetch_volumes(query, max_results)
                )
            }
            None => self.fetch_volumes(query, max_results).await,
        }
    }

    fn name(&self) -> &'static str {
        "google_books"
    }
}

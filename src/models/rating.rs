use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const MIN_RATING: f64 = 0.5;
pub const MAX_RATING: f64 = 5.0;

/// A user's rating of one book, with the book metadata captured at rating time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub user_id: String,
    pub book_id: String,
    pub rating: f64,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub info_link: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
}

/// Body of a create/replace rating request
///
/// Field names follow search results so an item can be posted back as is;
/// snake_case spellings are accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    #[serde(alias = "book_id")]
    pub book_id: String,
    pub rating: f64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    /// Genres of the rated book, named as the search provider names them
    #[serde(default, alias = "genres")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, alias = "info_link")]
    pub info_link: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default, alias = "published_date")]
    pub published_date: Option<String>,
}

impl RatingRequest {
    /// Validates the request and turns it into a record owned by `user_id`
    pub fn into_record(self, user_id: &str) -> AppResult<RatingRecord> {
        if user_id.trim().is_empty() {
            return Err(AppError::InvalidInput("user_id cannot be empty".to_string()));
        }
        if self.book_id.trim().is_empty() {
            return Err(AppError::InvalidInput("book_id cannot be empty".to_string()));
        }
        validate_rating(self.rating)?;

        Ok(RatingRecord {
            user_id: user_id.to_string(),
            book_id: self.book_id,
            rating: self.rating,
            genres: self.categories,
            authors: self.authors,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            title: self.title,
            thumbnail: self.thumbnail,
            info_link: self.info_link,
            publisher: self.publisher,
            published_date: self.published_date,
        })
    }
}

/// Checks that a rating lies within [MIN_RATING, MAX_RATING]
pub fn validate_rating(rating: f64) -> AppResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::InvalidInput(format!(
            "rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )));
    }
    Ok(())
}

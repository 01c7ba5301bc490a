use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{RatingRecord, RatingRequest},
    routes::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct RatingsResponse {
    pub count: usize,
    pub ratings: Vec<RatingRecord>,
}

/// Handler listing a user's ratings, most recent first
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<RatingsResponse>> {
    let ratings = state.ratings.list_ratings(&user_id).await?;
    Ok(Json(RatingsResponse {
        count: ratings.len(),
        ratings,
    }))
}

/// Handler creating or replacing a rating
pub async fn upsert_rating(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<RatingRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RatingRecord>)> {
    let Json(request) = body?;
    let record = request.into_record(&user_id)?;
    state.ratings.upsert_rating(record.clone()).await?;

    tracing::info!(
        user_id = %record.user_id,
        book_id = %record.book_id,
        rating = record.rating,
        "Rating saved"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler deleting a rating
pub async fn delete_rating(
    State(state): State<AppState>,
    Path((user_id, book_id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    if !state.ratings.delete_rating(&user_id, &book_id).await? {
        return Err(AppError::NotFound("Rating not found".to_string()));
    }

    tracing::info!(user_id = %user_id, book_id = %book_id, "Rating deleted");

    Ok(Json(json!({ "ok": true })))
}

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{ItemsResponse, PreferenceProfile},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    pub genre: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    pub author: String,
    pub limit: Option<usize>,
}

/// Handler for personalized recommendations
pub async fn for_user(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> AppResult<Json<ItemsResponse>> {
    let Query(params) = query?;
    let limit = params.limit.unwrap_or(state.default_limit);

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        limit,
        "Processing recommendation request"
    );

    let items = state.recommender.recommend_for_user(&user_id, limit).await?;
    Ok(Json(items.into()))
}

/// Handler for the derived preference profile of a user
pub async fn profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<PreferenceProfile>> {
    let profile = state.recommender.profile_for_user(&user_id).await?;
    Ok(Json(profile))
}

/// Handler for non-personalized genre recommendations
pub async fn by_genre(
    State(state): State<AppState>,
    query: Result<Query<GenreQuery>, QueryRejection>,
) -> AppResult<Json<ItemsResponse>> {
    let Query(params) = query?;
    let limit = params.limit.unwrap_or(state.default_limit);
    let items = state.recommender.recommend_by_genre(&params.genre, limit).await?;
    Ok(Json(items.into()))
}

/// Handler for non-personalized author recommendations
pub async fn by_author(
    State(state): State<AppState>,
    query: Result<Query<AuthorQuery>, QueryRejection>,
) -> AppResult<Json<ItemsResponse>> {
    let Query(params) = query?;
    let limit = params.limit.unwrap_or(state.default_limit);
    let items = state
        .recommender
        .recommend_by_author(&params.author, limit)
        .await?;
    Ok(Json(items.into()))
}

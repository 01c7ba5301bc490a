use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::RatingStore,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::recommendations::Recommender,
};

pub mod ratings;
pub mod recommendations;
pub mod search;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub ratings: Arc<dyn RatingStore>,
    /// Result count used when a request carries no `limit`
    pub default_limit: usize,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search::search))
        .route("/recommendations/genre", get(recommendations::by_genre))
        .route("/recommendations/author", get(recommendations::by_author))
        .route(
            "/users/:user_id/recommendations",
            get(recommendations::for_user),
        )
        .route("/users/:user_id/profile", get(recommendations::profile))
        .route(
            "/users/:user_id/ratings",
            get(ratings::list_ratings).post(ratings::upsert_rating),
        )
        .route(
            "/users/:user_id/ratings/:book_id",
            delete(ratings::delete_rating),
        )
}

/// Health check endpoint, reports rating store connectivity
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.ratings.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "store": state.ratings.name(),
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "database": "disconnected",
                    "error": e.to_string(),
                })),
            )
        }
    }
}

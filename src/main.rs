use std::sync::Arc;
use std::time::Duration;

use shelf_api::{
    config::{Config, RatingStoreKind},
    db::{self, Cache, InMemoryRatingStore, PgRatingStore, RatingStore},
    routes::{create_router, AppState},
    services::{GoogleBooksProvider, Recommender, RecommenderSettings, SearchProvider},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let ratings: Arc<dyn RatingStore> = match config.rating_store {
        RatingStoreKind::Postgres => {
            let pool = db::create_pool(&config.database_url).await?;
            db::postgres::run_migrations(&pool).await?;
            Arc::new(PgRatingStore::new(pool))
        }
        RatingStoreKind::Memory => {
            tracing::warn!("Using in-memory rating store, ratings are lost on restart");
            Arc::new(InMemoryRatingStore::new())
        }
    };

    // Search caching is optional: run uncached rather than refuse to start
    let (cache, cache_writer) = match &config.redis_url {
        Some(redis_url) => {
            let client = db::create_redis_client(redis_url)?;
            match Cache::connect(client).await {
                Ok((cache, handle)) => (Some(cache), Some(handle)),
                Err(e) => {
                    tracing::warn!(error = %e, "Redis unavailable, search results will not be cached");
                    (None, None)
                }
            }
        }
        None => (None, None),
    };

    let provider: Arc<dyn SearchProvider> = Arc::new(GoogleBooksProvider::new(
        &config.google_books_api_key,
        config.google_books_api_url.clone(),
        Duration::from_secs(config.search_timeout_secs),
        cache,
        config.search_cache_ttl_secs,
    )?);

    tracing::info!(
        rating_store = ratings.name(),
        search_provider = provider.name(),
        "Backends initialized"
    );

    let recommender = Recommender::new(
        ratings.clone(),
        provider,
        RecommenderSettings::from(&config),
    );

    let state = AppState {
        recommender: Arc::new(recommender),
        ratings,
        default_limit: config.default_recommendation_limit.max(1),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

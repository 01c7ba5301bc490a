pub mod postgres;
pub mod ratings;
pub mod redis;

pub use self::postgres::create_pool;
pub use self::ratings::{InMemoryRatingStore, PgRatingStore, RatingStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};

/// Read-through caching over Redis.
///
/// Returns the cached value when present. Otherwise runs `$block`, queues the
/// result for a background cache write, and returns it. A failed cache read is
/// logged and treated as a miss so Redis outages never fail the caller.
///
/// # Arguments
/// * `$cache`: A `Cache` (anything with `get_from_cache` and `set_in_background`).
/// * `$key`: The `CacheKey` to read and write.
/// * `$ttl`: Time-to-live for the stored value, in seconds.
/// * `$block`: Future computing the value on a miss; its error is propagated with `?`.
///
/// # Example
/// ```rust,ignore
/// let books = cached!(cache, key, 3600, async move {
///     fetch_books().await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %$key, "Cache hit");
                Ok(cached)
            }
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(error = %e, key = %$key, "Cache read failed, treating as miss");
                } else {
                    tracing::debug!(key = %$key, "Cache miss");
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}

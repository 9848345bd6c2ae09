//! Best-effort cache helpers
//!
//! Every function here is total over cache failure: an absent handle, an
//! unreachable cache, a malformed entry and a serialization failure all
//! collapse into `None` on reads and a silent no-op on writes, with a
//! debug-level log line. The cache is an optimization, never a
//! correctness dependency, so callers need no failure handling.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::connection::{BlockingCacheConnection, CacheConnection};
use crate::error::CacheError;

/// Prefix prepended to every key, isolating this cache's keyspace from
/// other consumers of the same store
pub const CACHE_KEY_PREFIX: &str = "cellar:cache:";

fn full_key(key: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, key)
}

/// Get a binary value from the cache
pub async fn get_bytes(cache: Option<&dyn CacheConnection>, key: &str) -> Option<Vec<u8>> {
    let cache = cache?;
    match try_get_bytes(cache, &full_key(key)).await {
        Ok(value) => value,
        Err(e) => {
            debug!("Cache get failed for {}: {}", key, e);
            None
        }
    }
}

/// Set a binary value in the cache
pub async fn set_bytes(cache: Option<&dyn CacheConnection>, key: &str, value: &[u8], ttl: Option<u64>) {
    let Some(cache) = cache else { return };
    let encoded = STANDARD.encode(value);
    if let Err(e) = cache.set(&full_key(key), &encoded, ttl).await {
        debug!("Cache set failed for {}: {}", key, e);
    }
}

/// Get a JSON value from the cache
pub async fn get_json<T: DeserializeOwned>(cache: Option<&dyn CacheConnection>, key: &str) -> Option<T> {
    let cache = cache?;
    match try_get_json(cache, &full_key(key)).await {
        Ok(value) => value,
        Err(e) => {
            debug!("Cache get_json failed for {}: {}", key, e);
            None
        }
    }
}

/// Set a JSON value in the cache
pub async fn set_json<T: Serialize>(
    cache: Option<&dyn CacheConnection>,
    key: &str,
    value: &T,
    ttl: Option<u64>,
) {
    let Some(cache) = cache else { return };
    if let Err(e) = try_set_json(cache, &full_key(key), value, ttl).await {
        debug!("Cache set_json failed for {}: {}", key, e);
    }
}

/// Blocking variant: get a JSON value from the cache
pub fn get_json_blocking<T: DeserializeOwned>(
    cache: Option<&dyn BlockingCacheConnection>,
    key: &str,
) -> Option<T> {
    let cache = cache?;
    let result = cache
        .get(&full_key(key))
        .and_then(|value| match value {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        });
    match result {
        Ok(value) => value,
        Err(e) => {
            debug!("Blocking cache get_json failed for {}: {}", key, e);
            None
        }
    }
}

/// Blocking variant: set a JSON value in the cache
pub fn set_json_blocking<T: Serialize>(
    cache: Option<&dyn BlockingCacheConnection>,
    key: &str,
    value: &T,
    ttl: Option<u64>,
) {
    let Some(cache) = cache else { return };
    let result = serde_json::to_string(value)
        .map_err(CacheError::from)
        .and_then(|encoded| cache.set(&full_key(key), &encoded, ttl));
    if let Err(e) = result {
        debug!("Blocking cache set_json failed for {}: {}", key, e);
    }
}

async fn try_get_bytes(
    cache: &dyn CacheConnection,
    full_key: &str,
) -> Result<Option<Vec<u8>>, CacheError> {
    match cache.get(full_key).await? {
        Some(text) => Ok(Some(STANDARD.decode(text.as_bytes())?)),
        None => Ok(None),
    }
}

async fn try_get_json<T: DeserializeOwned>(
    cache: &dyn CacheConnection,
    full_key: &str,
) -> Result<Option<T>, CacheError> {
    match cache.get(full_key).await? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

async fn try_set_json<T: Serialize>(
    cache: &dyn CacheConnection,
    full_key: &str,
    value: &T,
    ttl: Option<u64>,
) -> Result<(), CacheError> {
    let encoded = serde_json::to_string(value)?;
    cache.set(full_key, &encoded, ttl).await
}

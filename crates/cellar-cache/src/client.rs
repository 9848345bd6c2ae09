//! Redis cache client

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Commands};
use tracing::info;

use crate::connection::{BlockingCacheConnection, CacheConnection};
use crate::error::CacheError;

/// Redis-backed cache connection
///
/// The async path goes through a [`ConnectionManager`] created eagerly at
/// connect time, so an unreachable cache surfaces during startup and the
/// caller simply keeps no handle. The blocking path opens a short-lived
/// connection per call.
pub struct RedisCache {
    client: redis::Client,
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connect to the cache at `url` (e.g. `redis://127.0.0.1:6379/0`)
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client.clone()).await?;

        info!("Connected to cache");

        Ok(Self { client, manager })
    }
}

#[async_trait]
impl CacheConnection for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        match ttl {
            Some(seconds) => {
                let _: () = conn.set_ex(key, value, seconds).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }
}

impl BlockingCacheConnection for RedisCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.get_connection()?;
        Ok(conn.get(key)?)
    }

    fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), CacheError> {
        let mut conn = self.client.get_connection()?;
        match ttl {
            Some(seconds) => {
                let _: () = conn.set_ex(key, value, seconds)?;
            }
            None => {
                let _: () = conn.set(key, value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        assert!(RedisCache::connect("not-a-redis-url").await.is_err());
    }
}

//! Cache connection traits
//!
//! The underlying key-value store is an opaque collaborator: all the
//! helper layer needs is string-keyed get/set with an optional expiry.
//! Values are always transported as text; binary payloads are
//! base64-encoded before they reach a connection.

use async_trait::async_trait;

use crate::error::CacheError;

/// A remote key-value cache connection
#[async_trait]
pub trait CacheConnection: Send + Sync {
    /// Get the text value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl` seconds if given
    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), CacheError>;
}

/// Blocking variant of [`CacheConnection`] for synchronous call paths
/// (startup code, background workers)
pub trait BlockingCacheConnection: Send + Sync {
    /// Get the text value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl` seconds if given
    fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), CacheError>;
}

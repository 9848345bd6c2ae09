//! Cellar Cache Layer
//!
//! Best-effort helpers for caching binary and JSON values in a remote
//! key-value store. The cache handle is optional and every operation
//! degrades to "no value" when the cache is absent, unreachable or holds
//! a malformed entry; callers never handle cache failures.

pub mod client;
pub mod connection;
pub mod error;
pub mod helpers;

pub use client::RedisCache;
pub use connection::{BlockingCacheConnection, CacheConnection};
pub use error::CacheError;
pub use helpers::{
    get_bytes, get_json, get_json_blocking, set_bytes, set_json, set_json_blocking,
    CACHE_KEY_PREFIX,
};

//! Cache error types
//!
//! These never reach callers of the helper functions in
//! [`crate::helpers`]; every failure is collapsed into an absent value
//! there. The type exists for the [`crate::connection`] traits and for
//! the debug log lines.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty file content")]
    EmptyContent,

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("Storage backend error: {0}")]
    BackendWrite(#[source] object_store::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

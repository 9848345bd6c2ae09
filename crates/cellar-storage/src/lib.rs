//! Cellar Storage Layer
//!
//! This crate provides a pluggable blob-storage abstraction for Cellar,
//! supporting local disk and Azure-compatible blob backends. Remote
//! backends keep a byte-identical mirror of every object on local disk.
//!
//! The backend is selected once at startup from configuration via
//! [`create_backend`] and shared as an `Arc<dyn StorageBackend>`.

pub mod azure;
pub mod backend;
pub mod config;
pub mod error;
pub mod local;

pub use azure::{AzureConfig, AzureStorage};
pub use backend::{create_backend, create_pipeline_backend, filename_from_locator, StorageBackend};
pub use config::StorageConfig;
pub use error::StorageError;
pub use local::LocalStorage;

//! Storage backend trait and backend selection

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::azure::{AzureConfig, AzureStorage};
use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::local::LocalStorage;

/// Storage backend trait
///
/// Implementations of this trait persist opaque file content under a
/// caller-supplied filename and hand back an opaque locator string.
/// Locators must only be fed back to the backend that issued them.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store `content` under `filename`, overwriting any existing object.
    ///
    /// Returns the content unchanged together with the locator of the
    /// stored object. Zero-length content is rejected with
    /// [`StorageError::EmptyContent`] before anything is written.
    async fn upload(
        &self,
        content: Bytes,
        filename: &str,
        tags: &HashMap<String, String>,
    ) -> Result<(Bytes, String), StorageError>;

    /// Make the object behind `locator` available on local disk and
    /// return its local path.
    async fn fetch(&self, locator: &str) -> Result<PathBuf, StorageError>;

    /// Delete the object behind `locator`.
    async fn delete(&self, locator: &str) -> Result<(), StorageError>;

    /// Delete every object held by this backend.
    async fn delete_all(&self) -> Result<(), StorageError>;
}

/// Derive the stored filename from a locator (its last `/` segment)
pub fn filename_from_locator(locator: &str) -> Result<&str, StorageError> {
    locator
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| StorageError::InvalidLocator(locator.to_string()))
}

/// Create the storage backend selected in the configuration
///
/// Called once at startup; an unrecognized provider fails here with
/// [`StorageError::Configuration`] instead of on first use. The returned
/// handle is immutable and can be shared freely.
pub async fn create_backend(
    config: &StorageConfig,
) -> Result<Arc<dyn StorageBackend>, StorageError> {
    match config.provider.as_str() {
        "local" => Ok(Arc::new(LocalStorage::new(&config.local.path).await?)),
        "azure" => {
            let azure = azure_config(config, None)?;
            Ok(Arc::new(AzureStorage::new(azure, &config.local.path).await?))
        }
        other => Err(StorageError::Configuration(format!(
            "Unsupported storage provider: {}",
            other
        ))),
    }
}

/// Create an Azure backend targeting the pipeline container
///
/// Independent of the primary provider selection, for workflows that
/// stage their artifacts in a separate container.
pub async fn create_pipeline_backend(
    config: &StorageConfig,
) -> Result<Arc<dyn StorageBackend>, StorageError> {
    let container = config.azure.pipeline_container.clone().ok_or_else(|| {
        StorageError::Configuration("Azure pipeline container is not configured".to_string())
    })?;
    let azure = azure_config(config, Some(container))?;
    Ok(Arc::new(AzureStorage::new(azure, &config.local.path).await?))
}

/// Resolve the raw Azure section into a complete [`AzureConfig`],
/// optionally overriding the container name
fn azure_config(
    config: &StorageConfig,
    container: Option<String>,
) -> Result<AzureConfig, StorageError> {
    let endpoint = config.azure.endpoint.clone().ok_or_else(|| {
        StorageError::Configuration("Azure storage endpoint is not configured".to_string())
    })?;
    let container = container
        .or_else(|| config.azure.container.clone())
        .ok_or_else(|| {
            StorageError::Configuration("Azure storage container is not configured".to_string())
        })?;

    Ok(AzureConfig {
        endpoint,
        container,
        access_key: config.azure.access_key.clone(),
        allow_http: config.azure.allow_http,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AzureStorageConfig, LocalStorageConfig};

    fn test_config(provider: &str, root: &str) -> StorageConfig {
        StorageConfig {
            provider: provider.to_string(),
            local: LocalStorageConfig {
                path: root.to_string(),
            },
            azure: AzureStorageConfig::default(),
        }
    }

    #[test]
    fn test_filename_from_locator() {
        assert_eq!(filename_from_locator("report.pdf").unwrap(), "report.pdf");
        assert_eq!(
            filename_from_locator("/data/uploads/report.pdf").unwrap(),
            "report.pdf"
        );
        assert_eq!(
            filename_from_locator("https://acct.blob.core.windows.net/uploads/report.pdf")
                .unwrap(),
            "report.pdf"
        );
    }

    #[test]
    fn test_filename_from_locator_rejects_empty_segment() {
        assert!(matches!(
            filename_from_locator("/data/uploads/"),
            Err(StorageError::InvalidLocator(_))
        ));
        assert!(matches!(
            filename_from_locator(""),
            Err(StorageError::InvalidLocator(_))
        ));
    }

    #[tokio::test]
    async fn test_create_backend_local() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config("local", dir.path().to_str().unwrap());
        assert!(create_backend(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_backend_unknown_provider() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config("gcs", dir.path().to_str().unwrap());
        assert!(matches!(
            create_backend(&config).await,
            Err(StorageError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_create_backend_azure_requires_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config("azure", dir.path().to_str().unwrap());
        assert!(matches!(
            create_backend(&config).await,
            Err(StorageError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_create_pipeline_backend_requires_container() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config("azure", dir.path().to_str().unwrap());
        config.azure.endpoint = Some("https://acct.blob.core.windows.net".to_string());
        config.azure.container = Some("uploads".to_string());
        assert!(matches!(
            create_pipeline_backend(&config).await,
            Err(StorageError::Configuration(_))
        ));
    }
}

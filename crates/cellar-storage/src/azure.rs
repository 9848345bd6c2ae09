//! Azure blob storage backend
//!
//! Uses the `object_store` crate to talk to an Azure-compatible blob
//! service. Every object is also mirrored to local disk so callers keep
//! a durable local copy even when the remote store is unavailable.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::backend::{filename_from_locator, StorageBackend};
use crate::error::StorageError;
use crate::local::LocalStorage;

/// Azure storage configuration
#[derive(Debug, Clone)]
pub struct AzureConfig {
    /// Blob service endpoint, e.g. `https://<account>.blob.core.windows.net`
    pub endpoint: String,
    /// Container name; the container itself is managed out of band
    pub container: String,
    /// Shared access key; `None` selects the ambient credential chain
    /// (environment, managed identity)
    pub access_key: Option<String>,
    /// Allow plain-HTTP endpoints (Azurite, local development)
    pub allow_http: bool,
}

/// Azure blob storage backend
///
/// Objects are keyed by their caller-supplied filename inside a single
/// container. Locators have the form `<endpoint>/<container>/<filename>`.
pub struct AzureStorage {
    store: Arc<dyn ObjectStore>,
    endpoint: String,
    container: String,
    local: LocalStorage,
}

impl AzureStorage {
    /// Create a new Azure storage backend mirroring into `upload_dir`
    pub async fn new(
        config: AzureConfig,
        upload_dir: impl AsRef<Path>,
    ) -> Result<Self, StorageError> {
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        let account = account_from_endpoint(&endpoint)?;

        let mut builder = MicrosoftAzureBuilder::new()
            .with_account(&account)
            .with_container_name(&config.container)
            .with_endpoint(endpoint.clone());

        if let Some(key) = &config.access_key {
            builder = builder.with_access_key(key);
        }

        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder.build().map_err(|e| {
            StorageError::Configuration(format!("Failed to create Azure client: {}", e))
        })?;

        let local = LocalStorage::new(upload_dir).await?;

        info!(
            "Initialized Azure storage: endpoint={}, container={}",
            endpoint, config.container
        );

        Ok(Self {
            store: Arc::new(store),
            endpoint,
            container: config.container,
            local,
        })
    }
}

/// Derive the storage account name from the endpoint host
/// (`<account>.blob.core.windows.net`)
fn account_from_endpoint(endpoint: &str) -> Result<String, StorageError> {
    let url = Url::parse(endpoint).map_err(|e| {
        StorageError::Configuration(format!("Invalid Azure endpoint {}: {}", endpoint, e))
    })?;

    url.host_str()
        .and_then(|host| host.split('.').next())
        .filter(|account| !account.is_empty())
        .map(|account| account.to_string())
        .ok_or_else(|| {
            StorageError::Configuration(format!(
                "Cannot derive account name from endpoint {}",
                endpoint
            ))
        })
}

#[async_trait]
impl StorageBackend for AzureStorage {
    async fn upload(
        &self,
        content: Bytes,
        filename: &str,
        tags: &HashMap<String, String>,
    ) -> Result<(Bytes, String), StorageError> {
        // Mirror locally first: this validates the content and the local
        // copy stays on disk even when the remote write fails.
        let (content, _) = self.local.upload(content, filename, tags).await?;

        let path = ObjectPath::from(filename);
        debug!("Uploading blob to Azure: {:?}", path);

        self.store
            .put(&path, PutPayload::from(content.clone()))
            .await
            .map_err(StorageError::BackendWrite)?;

        Ok((
            content,
            format!("{}/{}/{}", self.endpoint, self.container, filename),
        ))
    }

    async fn fetch(&self, locator: &str) -> Result<PathBuf, StorageError> {
        let filename = filename_from_locator(locator)?;
        let path = ObjectPath::from(filename);
        debug!("Downloading blob from Azure: {:?}", path);

        let result = self.store.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(filename.to_string()),
            e => StorageError::BackendWrite(e),
        })?;

        let data = result.bytes().await.map_err(StorageError::BackendWrite)?;

        self.local.write(filename, &data).await
    }

    async fn delete(&self, locator: &str) -> Result<(), StorageError> {
        let filename = filename_from_locator(locator)?;
        let path = ObjectPath::from(filename);
        debug!("Deleting blob from Azure: {:?}", path);

        let remote = self.store.delete(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(filename.to_string()),
            e => StorageError::BackendWrite(e),
        });

        // The local mirror is removed whether or not the remote delete
        // succeeded.
        self.local.delete(locator).await?;

        remote
    }

    async fn delete_all(&self) -> Result<(), StorageError> {
        let mut listing = self.store.list(None);

        while let Some(meta) = listing.next().await {
            let meta = meta.map_err(StorageError::BackendWrite)?;
            debug!("Deleting blob from Azure: {:?}", meta.location);
            self.store
                .delete(&meta.location)
                .await
                .map_err(StorageError::BackendWrite)?;
        }

        // Only reached once the whole remote sweep succeeded
        self.local.delete_all().await
    }
}

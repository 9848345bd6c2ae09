//! Local disk storage backend

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::backend::{filename_from_locator, StorageBackend};
use crate::error::StorageError;

/// Local disk storage backend
///
/// Stores files in a single flat root directory under their caller-supplied
/// filenames. Also serves as the local mirror for remote backends.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage backend rooted at `root`
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;

        info!("Initialized local storage at {:?}", root);

        Ok(Self { root })
    }

    /// Get the on-disk path for a filename
    fn file_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Write `data` to `<root>/<filename>`, overwriting any existing file
    pub(crate) async fn write(&self, filename: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.file_path(filename);
        debug!("Writing {} bytes to {:?}", data.len(), path);
        fs::write(&path, data).await?;
        Ok(path)
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(
        &self,
        content: Bytes,
        filename: &str,
        _tags: &HashMap<String, String>,
    ) -> Result<(Bytes, String), StorageError> {
        if content.is_empty() {
            return Err(StorageError::EmptyContent);
        }

        let path = self.write(filename, &content).await?;
        Ok((content, path.to_string_lossy().to_string()))
    }

    async fn fetch(&self, locator: &str) -> Result<PathBuf, StorageError> {
        // Local files are already locally resident
        if locator.is_empty() {
            return Err(StorageError::InvalidLocator(locator.to_string()));
        }
        Ok(PathBuf::from(locator))
    }

    async fn delete(&self, locator: &str) -> Result<(), StorageError> {
        let filename = filename_from_locator(locator)?;
        let path = self.file_path(filename);

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("File {:?} not found in local storage", path);
                Ok(())
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn delete_all(&self) -> Result<(), StorageError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Directory {:?} not found in local storage", self.root);
                return Ok(());
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            // read_dir does not follow symlinks, so a link to a directory
            // is removed as a file
            let result = match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => fs::remove_dir_all(&path).await,
                Ok(_) => fs::remove_file(&path).await,
                Err(e) => Err(e),
            };

            if let Err(e) = result {
                error!("Failed to delete {:?}: {}", path, e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_upload_and_fetch_roundtrip() {
        let (_dir, storage) = test_storage().await;

        let content = Bytes::from_static(b"hello cellar");
        let (returned, locator) = storage
            .upload(content.clone(), "greeting.txt", &HashMap::new())
            .await
            .unwrap();
        assert_eq!(returned, content);

        let path = storage.fetch(&locator).await.unwrap();
        let on_disk = fs::read(&path).await.unwrap();
        assert_eq!(on_disk, content);
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_content() {
        let (dir, storage) = test_storage().await;

        let result = storage
            .upload(Bytes::new(), "empty.txt", &HashMap::new())
            .await;
        assert!(matches!(result, Err(StorageError::EmptyContent)));
        assert!(!dir.path().join("empty.txt").exists());
    }

    #[tokio::test]
    async fn test_upload_overwrites_existing_file() {
        let (_dir, storage) = test_storage().await;

        storage
            .upload(Bytes::from_static(b"first"), "doc.txt", &HashMap::new())
            .await
            .unwrap();
        let (_, locator) = storage
            .upload(Bytes::from_static(b"second"), "doc.txt", &HashMap::new())
            .await
            .unwrap();

        let path = storage.fetch(&locator).await.unwrap();
        assert_eq!(fs::read(&path).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let (dir, storage) = test_storage().await;

        let (_, locator) = storage
            .upload(Bytes::from_static(b"data"), "doc.txt", &HashMap::new())
            .await
            .unwrap();
        storage.delete(&locator).await.unwrap();
        assert!(!dir.path().join("doc.txt").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_not_an_error() {
        let (_dir, storage) = test_storage().await;
        storage.delete("/somewhere/else/ghost.txt").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_all_clears_root() {
        let (dir, storage) = test_storage().await;

        storage
            .upload(Bytes::from_static(b"a"), "a.txt", &HashMap::new())
            .await
            .unwrap();
        storage
            .upload(Bytes::from_static(b"b"), "b.txt", &HashMap::new())
            .await
            .unwrap();
        fs::create_dir(dir.path().join("nested")).await.unwrap();
        fs::write(dir.path().join("nested/c.txt"), b"c").await.unwrap();

        storage.delete_all().await.unwrap();

        let mut entries = fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_all_missing_root_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("uploads")).await.unwrap();
        fs::remove_dir(dir.path().join("uploads")).await.unwrap();

        storage.delete_all().await.unwrap();
    }
}

//! Filesystem-backed object store for development setups

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::storage::traits::ObjectStore;

/// Stores each bucket as a directory under `root`
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve an object path, refusing anything that escapes its bucket
    fn resolve(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = bucket.is_empty()
            || bucket.contains(['/', '\\'])
            || bucket == ".."
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));

        if escapes || path.is_empty() {
            return Err(AppError::Validation(format!(
                "Invalid object path '{}/{}'",
                bucket, path
            )));
        }

        Ok(self.root.join(bucket).join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn put(&self, bucket: &str, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<()> {
        let file_path = self.resolve(bucket, path)?;

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create {:?}: {}", parent, e)))?;
        }

        fs::write(&file_path, &bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {:?}: {}", file_path, e)))?;

        debug!(path = ?file_path, size = bytes.len(), "Saved object file");
        Ok(())
    }

    async fn exists(&self, bucket: &str, path: &str) -> Result<bool> {
        let file_path = self.resolve(bucket, path)?;
        match fs::metadata(&file_path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to stat {:?}: {}",
                file_path, e
            ))),
        }
    }

    async fn get(&self, bucket: &str, path: &str) -> Result<Vec<u8>> {
        let file_path = self.resolve(bucket, path)?;
        fs::read(&file_path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::NotFound(format!("gs://{}/{}", bucket, path)),
            _ => AppError::Storage(format!("Failed to read {:?}: {}", file_path, e)),
        })
    }
}

//! Object store abstraction

use async_trait::async_trait;

use crate::error::Result;

/// A bucketed object store.
///
/// Implementations report failures as `AppError::Storage`, and `get` reports
/// a missing object as `AppError::NotFound`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn name(&self) -> &str;

    /// Write an object, replacing any previous content at that path
    async fn put(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    async fn exists(&self, bucket: &str, path: &str) -> Result<bool>;

    async fn get(&self, bucket: &str, path: &str) -> Result<Vec<u8>>;
}

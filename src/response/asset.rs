//! Asset retrieval - fetches stored images back for download

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::response::format::content_type_for_extension;
use crate::response::scratch::ScratchSpace;
use crate::storage::{ObjectStore, StorageLocator};

/// Stem of the file name offered to the downloading client
pub const DOWNLOAD_FILE_STEM: &str = "generated_image";

/// A downloaded asset ready to be sent back
#[derive(Debug, Clone)]
pub struct Asset {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

pub struct AssetRetrieval {
    store: Arc<dyn ObjectStore>,
    scratch: ScratchSpace,
}

impl AssetRetrieval {
    pub fn new(store: Arc<dyn ObjectStore>, scratch: ScratchSpace) -> Self {
        Self { store, scratch }
    }

    /// Fetch the object behind `locator`.
    ///
    /// The locator is validated before the store is contacted. The object is
    /// staged in a scratch file that is discarded before returning.
    pub async fn fetch(&self, locator: &str) -> Result<Asset> {
        let locator = StorageLocator::parse(locator)?;

        if !self.store.exists(locator.bucket(), locator.path()).await? {
            return Err(AppError::NotFound(format!("File not found: {}", locator)));
        }

        let extension = locator.extension().unwrap_or_default();
        let content_type = content_type_for_extension(&extension);

        let bytes = self.store.get(locator.bucket(), locator.path()).await?;
        let staged = self.scratch.persist("download_", &extension, &bytes).await?;
        debug!(locator = %locator, path = ?staged.path(), "Staged asset for download");
        let bytes = staged.read().await?;

        info!(locator = %locator, content_type = %content_type, size = bytes.len(), "Fetched asset");

        Ok(Asset {
            bytes,
            content_type,
            file_name: format!("{}{}", DOWNLOAD_FILE_STEM, extension),
        })
    }
}

//! Storage module - object store clients and asset locators

pub mod gcs;
pub mod local;
pub mod locator;
pub mod memory;
pub mod traits;

pub use locator::StorageLocator;
pub use traits::ObjectStore;

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::credentials::TokenSource;
use crate::error::{AppError, Result};

/// Build the configured object store
pub fn build_store(settings: &Settings) -> Result<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match settings.storage.provider.as_str() {
        "gcs" => Arc::new(gcs::GcsStore::new(
            &settings.storage.endpoint,
            TokenSource::from_config(&settings.credentials),
        )?),
        "local" => Arc::new(local::LocalStore::new(&settings.storage.local_path)),
        "memory" => Arc::new(memory::MemoryStore::new()),
        other => {
            return Err(AppError::Internal(format!(
                "Unsupported storage provider '{}'",
                other
            )))
        }
    };

    info!(provider = %store.name(), bucket = %settings.storage.bucket, "Initialized object store");
    Ok(store)
}

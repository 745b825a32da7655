//! Virtual Try-On Gateway
//!
//! Turns structured outfit descriptions into image prompts, brokers them to a
//! managed image generation backend, and serves the stored results.

pub mod api;
pub mod backend;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod prompt;
pub mod response;
pub mod storage;

pub use error::{AppError, Result};

use std::sync::Arc;

use backend::traits::ImageBackend;
use gateway::{GatewayOptions, GenerationGateway};
use response::{AssetRetrieval, ScratchSpace};
use storage::ObjectStore;

/// Application state shared across all handlers.
///
/// Built once at startup; collaborators are injected so tests can swap in
/// stubs.
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub gateway: Arc<GenerationGateway>,
    pub assets: Arc<AssetRetrieval>,
    pub scratch: ScratchSpace,
}

impl AppState {
    /// Assemble state around explicit collaborators
    pub fn new(
        settings: config::Settings,
        backend: Arc<dyn ImageBackend>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let scratch = ScratchSpace::new(&settings.scratch.dir);
        let options = GatewayOptions::from_config(&settings.backend, &settings.storage);

        Self {
            gateway: Arc::new(GenerationGateway::new(backend, store.clone(), options)),
            assets: Arc::new(AssetRetrieval::new(store, scratch.clone())),
            scratch,
            settings: Arc::new(settings),
        }
    }

    /// Assemble state with the collaborators named in the settings
    pub fn from_settings(settings: config::Settings) -> Result<Self> {
        let backend = backend::build_backend(&settings)?;
        let store = storage::build_store(&settings)?;
        Ok(Self::new(settings, backend, store))
    }
}

//! Generation gateway - calls the image backend and persists its output

pub mod request;

pub use request::{GenerationRequest, ReferenceImage};

use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::backend::traits::{
    EditMode, EditRequest, GenerateRequest, GeneratedImage, ImageBackend, SubjectReference,
};
use crate::config::{BackendConfig, StorageConfig};
use crate::error::{AppError, Result};
use crate::response::format::storage_format;
use crate::storage::{ObjectStore, StorageLocator};

/// Request parameters fixed for the lifetime of the gateway
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub bucket: String,
    pub object_prefix: String,
    pub aspect_ratio: String,
    pub safety_setting: String,
    pub language: String,
}

impl GatewayOptions {
    pub fn from_config(backend: &BackendConfig, storage: &StorageConfig) -> Self {
        Self {
            bucket: storage.bucket.clone(),
            object_prefix: storage.object_prefix.trim_matches('/').to_string(),
            aspect_ratio: backend.aspect_ratio.clone(),
            safety_setting: backend.safety_setting.clone(),
            language: backend.language.clone(),
        }
    }
}

/// Turns prompts into stored images.
///
/// Each call asks the backend for exactly one image and stores it under a new
/// random object path, so a returned locator always names a complete object
/// that is never overwritten.
pub struct GenerationGateway {
    backend: Arc<dyn ImageBackend>,
    store: Arc<dyn ObjectStore>,
    options: GatewayOptions,
}

impl GenerationGateway {
    pub fn new(
        backend: Arc<dyn ImageBackend>,
        store: Arc<dyn ObjectStore>,
        options: GatewayOptions,
    ) -> Self {
        Self {
            backend,
            store,
            options,
        }
    }

    /// Dispatch a request to `generate` or `edit`
    pub async fn submit(&self, request: GenerationRequest) -> Result<StorageLocator> {
        debug!(prompt_len = request.prompt().len(), "Submitting generation request");
        match request {
            GenerationRequest::TextToImage { prompt } => self.generate(&prompt).await,
            GenerationRequest::ImageEdit { prompt, reference } => {
                self.edit(reference, &prompt).await
            }
        }
    }

    /// Generate one image from a text prompt
    pub async fn generate(&self, prompt: &str) -> Result<StorageLocator> {
        debug!(backend = %self.backend.name(), prompt = %prompt, "Generating image");

        let request = GenerateRequest {
            prompt: prompt.to_string(),
            count: 1,
            aspect_ratio: self.options.aspect_ratio.clone(),
            safety_setting: self.options.safety_setting.clone(),
            language: self.options.language.clone(),
        };

        let images = self.backend.generate_images(request).await.map_err(|e| {
            error!(error = %e, prompt = %prompt, "Image generation failed");
            e
        })?;

        self.persist_first(images).await
    }

    /// Change the clothing on a reference image, keeping its subject
    pub async fn edit(&self, reference: ReferenceImage, prompt: &str) -> Result<StorageLocator> {
        debug!(backend = %self.backend.name(), prompt = %prompt, "Editing reference image");

        let image = reference.load().await?;
        let request = EditRequest {
            prompt: prompt.to_string(),
            reference: SubjectReference::person(image),
            count: 1,
            mode: EditMode::Default,
            language: self.options.language.clone(),
        };

        let images = self.backend.edit_image(request).await.map_err(|e| {
            error!(error = %e, prompt = %prompt, "Image edit failed");
            e
        })?;

        self.persist_first(images).await
    }

    async fn persist_first(&self, images: Vec<GeneratedImage>) -> Result<StorageLocator> {
        let image = images.into_iter().next().ok_or_else(|| {
            AppError::Generation("Backend returned no images".to_string())
        })?;

        let (extension, content_type) = storage_format(&image.bytes, image.mime_type.as_deref());
        let locator = StorageLocator::new(
            self.options.bucket.clone(),
            self.object_path(extension),
        );

        self.store
            .put(locator.bucket(), locator.path(), image.bytes, content_type)
            .await
            .map_err(|e| match e {
                storage @ AppError::Storage(_) => storage,
                other => AppError::Storage(other.to_string()),
            })?;

        info!(locator = %locator, content_type = %content_type, "Stored generated image");
        Ok(locator)
    }

    fn object_path(&self, extension: &str) -> String {
        let name = format!("{}.{}", Uuid::new_v4(), extension);
        if self.options.object_prefix.is_empty() {
            name
        } else {
            format!("{}/{}", self.options.object_prefix, name)
        }
    }
}

//! Backend module - image generation collaborators

pub mod traits;
pub mod vertex;

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::credentials::TokenSource;
use crate::error::{AppError, Result};
use traits::ImageBackend;

/// Build the configured image backend
pub fn build_backend(settings: &Settings) -> Result<Arc<dyn ImageBackend>> {
    match settings.backend.provider.as_str() {
        "vertex" => {
            let tokens = TokenSource::from_config(&settings.credentials);
            let backend = vertex::VertexBackend::new(&settings.backend, tokens)?;
            info!(
                project = %settings.backend.project_id,
                location = %settings.backend.location,
                "Initialized Vertex AI backend"
            );
            Ok(Arc::new(backend))
        }
        other => Err(AppError::Internal(format!(
            "Unsupported backend provider '{}'",
            other
        ))),
    }
}

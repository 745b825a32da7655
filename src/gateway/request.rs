//! Per-request generation inputs

use std::path::PathBuf;
use tokio::fs;

use crate::error::{AppError, Result};

/// Reference image for an edit, either in memory or staged on disk
#[derive(Debug, Clone)]
pub enum ReferenceImage {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl ReferenceImage {
    /// Load the image bytes
    pub async fn load(self) -> Result<Vec<u8>> {
        let bytes = match self {
            Self::Bytes(bytes) => bytes,
            Self::Path(path) => fs::read(&path).await.map_err(|e| {
                AppError::Generation(format!("Failed to load reference image {:?}: {}", path, e))
            })?,
        };

        if bytes.is_empty() {
            return Err(AppError::Validation("Reference image is empty".to_string()));
        }

        Ok(bytes)
    }
}

/// One unit of work for the generation gateway
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    TextToImage {
        prompt: String,
    },
    ImageEdit {
        prompt: String,
        reference: ReferenceImage,
    },
}

impl GenerationRequest {
    pub fn prompt(&self) -> &str {
        match self {
            Self::TextToImage { prompt } | Self::ImageEdit { prompt, .. } => prompt,
        }
    }
}

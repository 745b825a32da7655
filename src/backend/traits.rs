//! Common traits and types for image generation backends

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Request to generate images from text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The prompt to generate images from
    pub prompt: String,

    /// Number of images to generate
    pub count: u32,

    /// Aspect ratio such as "1:1" or "3:4"
    pub aspect_ratio: String,

    /// Safety filter threshold understood by the backend
    pub safety_setting: String,

    /// Prompt language
    pub language: String,
}

/// What kind of subject a reference image binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectType {
    Person,
    Animal,
    Product,
    Default,
}

/// Edit strategy requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditMode {
    Default,
    InpaintInsertion,
    InpaintRemoval,
    Outpaint,
}

/// A tagged input image whose subject identity is preserved by an edit
#[derive(Debug, Clone)]
pub struct SubjectReference {
    pub reference_id: u32,
    pub image: Vec<u8>,
    pub subject_type: SubjectType,
}

impl SubjectReference {
    pub fn person(image: Vec<u8>) -> Self {
        Self {
            reference_id: 1,
            image,
            subject_type: SubjectType::Person,
        }
    }
}

/// Request to edit an image around a subject reference
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub prompt: String,
    pub reference: SubjectReference,
    pub count: u32,
    pub mode: EditMode,
    pub language: String,
}

/// Generated image data
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Raw encoded image bytes
    pub bytes: Vec<u8>,

    /// MIME type reported by the backend
    pub mime_type: Option<String>,
}

/// Trait for image generation backends.
///
/// Both operations return every image the backend produced, which may be
/// none when the safety filter rejected all outputs.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Generate images from a text prompt
    async fn generate_images(&self, request: GenerateRequest) -> Result<Vec<GeneratedImage>>;

    /// Edit a reference image while preserving its subject
    async fn edit_image(&self, request: EditRequest) -> Result<Vec<GeneratedImage>>;
}

//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use tryon_gateway::backend::traits::{EditRequest, GenerateRequest, GeneratedImage, ImageBackend};
use tryon_gateway::config::Settings;
use tryon_gateway::storage::memory::MemoryStore;
use tryon_gateway::{AppError, AppState, Result};

pub const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x01, 0x02];

pub const BOUNDARY: &str = "tryon-test-boundary";

/// Backend that records calls and answers with a fixed number of PNGs
#[derive(Default)]
pub struct StubBackend {
    pub image_count: usize,
    pub error: Option<String>,
    pub generate_calls: Mutex<Vec<GenerateRequest>>,
    pub edit_calls: Mutex<Vec<EditRequest>>,
}

impl StubBackend {
    pub fn returning(image_count: usize) -> Self {
        Self {
            image_count,
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Default::default()
        }
    }

    fn images(&self) -> Result<Vec<GeneratedImage>> {
        if let Some(message) = &self.error {
            return Err(AppError::Generation(message.clone()));
        }
        Ok((0..self.image_count)
            .map(|_| GeneratedImage {
                bytes: PNG_BYTES.to_vec(),
                mime_type: Some("image/png".to_string()),
            })
            .collect())
    }
}

#[async_trait]
impl ImageBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate_images(&self, request: GenerateRequest) -> Result<Vec<GeneratedImage>> {
        self.generate_calls.lock().push(request);
        self.images()
    }

    async fn edit_image(&self, request: EditRequest) -> Result<Vec<GeneratedImage>> {
        self.edit_calls.lock().push(request);
        self.images()
    }
}

/// App state over stub collaborators with its own scratch directory
pub struct TestApp {
    pub state: Arc<AppState>,
    pub backend: Arc<StubBackend>,
    pub store: Arc<MemoryStore>,
    pub scratch: tempfile::TempDir,
}

impl TestApp {
    pub fn new(backend: StubBackend) -> Self {
        let scratch = tempfile::tempdir().unwrap();

        let mut settings = Settings::default();
        settings.storage.bucket = "assets".to_string();
        settings.backend.project_id = "test-project".to_string();
        settings.scratch.dir = scratch.path().to_string_lossy().to_string();

        let backend = Arc::new(backend);
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(AppState::new(settings, backend.clone(), store.clone()));

        Self {
            state,
            backend,
            store,
            scratch,
        }
    }

    pub fn router(&self) -> axum::Router {
        tryon_gateway::api::create_router(self.state.clone())
    }

    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch.path()).unwrap().count()
    }
}

/// Encode a `generate_tryon` form body, returning (content type, body)
pub fn tryon_form(user_request: &str, image: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"user_request\"\r\n\r\n");
    body.extend_from_slice(user_request.as_bytes());
    body.extend_from_slice(b"\r\n");

    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"reference_image\"; filename=\"{}\"\r\n",
                file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

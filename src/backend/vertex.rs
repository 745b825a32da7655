//! Vertex AI Imagen backend over the REST `:predict` endpoint

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::traits::{
    EditMode, EditRequest, GenerateRequest, GeneratedImage, ImageBackend, SubjectType,
};
use crate::config::BackendConfig;
use crate::credentials::TokenSource;
use crate::error::{AppError, Result};

/// Imagen models served from a Vertex AI project
pub struct VertexBackend {
    name: String,
    client: Client,
    api_root: String,
    project_id: String,
    location: String,
    generate_model: String,
    edit_model: String,
    tokens: TokenSource,
}

#[derive(Debug, Serialize)]
struct PredictRequest<I: Serialize, P: Serialize> {
    instances: Vec<I>,
    parameters: P,
}

#[derive(Debug, Serialize)]
struct GenerateInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateParameters {
    sample_count: u32,
    aspect_ratio: String,
    safety_setting: String,
    language: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EditInstance {
    prompt: String,
    reference_images: Vec<ApiReferenceImage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiReferenceImage {
    reference_type: &'static str,
    reference_id: u32,
    reference_image: ApiImage,
    subject_image_config: SubjectImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiImage {
    bytes_base64_encoded: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubjectImageConfig {
    subject_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EditParameters {
    sample_count: u32,
    edit_mode: &'static str,
    language: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    rai_filtered_reason: Option<String>,
}

fn subject_type_name(subject_type: SubjectType) -> &'static str {
    match subject_type {
        SubjectType::Person => "SUBJECT_TYPE_PERSON",
        SubjectType::Animal => "SUBJECT_TYPE_ANIMAL",
        SubjectType::Product => "SUBJECT_TYPE_PRODUCT",
        SubjectType::Default => "SUBJECT_TYPE_DEFAULT",
    }
}

fn edit_mode_name(mode: EditMode) -> &'static str {
    match mode {
        EditMode::Default => "EDIT_MODE_DEFAULT",
        EditMode::InpaintInsertion => "EDIT_MODE_INPAINT_INSERTION",
        EditMode::InpaintRemoval => "EDIT_MODE_INPAINT_REMOVAL",
        EditMode::Outpaint => "EDIT_MODE_OUTPAINT",
    }
}

impl VertexBackend {
    /// Create a new Vertex backend from configuration
    pub fn new(config: &BackendConfig, tokens: TokenSource) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: "vertex".to_string(),
            client,
            api_root: config.api_root(),
            project_id: config.project_id.clone(),
            location: config.location.clone(),
            generate_model: config.generate_model.clone(),
            edit_model: config.edit_model.clone(),
            tokens,
        })
    }

    fn predict_url(&self, model: &str) -> String {
        format!(
            "{}/projects/{}/locations/{}/publishers/google/models/{}:predict",
            self.api_root, self.project_id, self.location, model
        )
    }

    async fn predict<B: Serialize>(&self, model: &str, body: &B) -> Result<Vec<GeneratedImage>> {
        let url = self.predict_url(model);
        debug!(backend = %self.name, model = %model, "Sending predict request");

        let request = self
            .tokens
            .authorize(self.client.post(&url).json(body))
            .await
            .map_err(|e| AppError::Generation(format!("Could not obtain credentials: {}", e)))?;

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Generation(format!("Request to {} failed: {}", model, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(backend = %self.name, model = %model, status = %status, "Predict request rejected");
            return Err(AppError::Generation(format!(
                "Backend returned {}: {}",
                status, body
            )));
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| AppError::Generation(format!("Failed to parse response: {}", e)))?;

        let mut images = Vec::with_capacity(parsed.predictions.len());
        for prediction in parsed.predictions {
            let Some(encoded) = prediction.bytes_base64_encoded else {
                if let Some(reason) = prediction.rai_filtered_reason {
                    warn!(backend = %self.name, reason = %reason, "Image filtered by safety settings");
                }
                continue;
            };

            let bytes = STANDARD
                .decode(encoded.trim())
                .map_err(|e| AppError::Generation(format!("Invalid image payload: {}", e)))?;

            images.push(GeneratedImage {
                bytes,
                mime_type: prediction.mime_type,
            });
        }

        debug!(backend = %self.name, model = %model, count = images.len(), "Predict request completed");
        Ok(images)
    }
}

#[async_trait]
impl ImageBackend for VertexBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_images(&self, request: GenerateRequest) -> Result<Vec<GeneratedImage>> {
        let body = PredictRequest {
            instances: vec![GenerateInstance {
                prompt: request.prompt,
            }],
            parameters: GenerateParameters {
                sample_count: request.count,
                aspect_ratio: request.aspect_ratio,
                safety_setting: request.safety_setting,
                language: request.language,
            },
        };

        self.predict(&self.generate_model, &body).await
    }

    async fn edit_image(&self, request: EditRequest) -> Result<Vec<GeneratedImage>> {
        let reference = request.reference;
        let body = PredictRequest {
            instances: vec![EditInstance {
                prompt: request.prompt,
                reference_images: vec![ApiReferenceImage {
                    reference_type: "REFERENCE_TYPE_SUBJECT",
                    reference_id: reference.reference_id,
                    reference_image: ApiImage {
                        bytes_base64_encoded: STANDARD.encode(&reference.image),
                    },
                    subject_image_config: SubjectImageConfig {
                        subject_type: subject_type_name(reference.subject_type),
                    },
                }],
            }],
            parameters: EditParameters {
                sample_count: request.count,
                edit_mode: edit_mode_name(request.mode),
                language: request.language,
            },
        };

        self.predict(&self.edit_model, &body).await
    }
}

//! Request handlers for the try-on API

use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::{AppError, Result};
use crate::gateway::{GenerationRequest, ReferenceImage};
use crate::prompt::{compose_edit_prompt, compose_model_prompt, TryOnRequest};
use crate::response::scratch::suffix_from_file_name;
use crate::AppState;

/// Uploaded reference image part
struct Upload {
    file_name: Option<String>,
    bytes: Vec<u8>,
}

/// Parsed multipart body of `POST /generate_tryon`
struct TryOnForm {
    user_request: String,
    reference_image: Option<Upload>,
}

impl TryOnForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut user_request = None;
        let mut reference_image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart body: {}", e)))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("user_request") => {
                    let text = field.text().await.map_err(|e| {
                        AppError::Validation(format!("Unreadable user_request field: {}", e))
                    })?;
                    user_request = Some(text);
                }
                Some("reference_image") => {
                    let file_name = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await.map_err(|e| {
                        AppError::Validation(format!("Unreadable reference_image field: {}", e))
                    })?;
                    // Browsers send an empty part when no file was chosen
                    if !bytes.is_empty() {
                        reference_image = Some(Upload {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        let user_request = user_request
            .ok_or_else(|| AppError::Validation("Missing user_request field".to_string()))?;

        Ok(Self {
            user_request,
            reference_image,
        })
    }
}

/// Locator of the produced image, keyed by which flow produced it
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TryOnResponse {
    HumanModelImageUrl(String),
    GeneratedImageUrl(String),
}

/// POST /generate_tryon
pub async fn generate_tryon(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<TryOnResponse>> {
    let form = TryOnForm::from_multipart(multipart).await?;
    let raw_request = form.user_request.clone();

    run_tryon(&state, form).await.map(Json).map_err(|e| {
        error!(error = %e, request = %raw_request, "Error generating try-on");
        e
    })
}

async fn run_tryon(state: &AppState, form: TryOnForm) -> Result<TryOnResponse> {
    let request: TryOnRequest = serde_json::from_str(&form.user_request)
        .map_err(|e| AppError::Validation(format!("Invalid user_request JSON: {}", e)))?;
    let input = request.user_input;

    match form.reference_image {
        None => {
            let prompt = compose_model_prompt(&input);
            let locator = state
                .gateway
                .submit(GenerationRequest::TextToImage { prompt })
                .await?;

            info!(locator = %locator, "Generated human model image");
            Ok(TryOnResponse::HumanModelImageUrl(locator.to_string()))
        }
        Some(upload) => {
            input.ensure_no_demographics()?;

            let staged = state
                .scratch
                .persist(
                    "reference_",
                    &suffix_from_file_name(upload.file_name.as_deref()),
                    &upload.bytes,
                )
                .await?;
            debug!(path = ?staged.path(), "Reference image staged");

            let prompt = compose_edit_prompt(&input);
            let locator = state
                .gateway
                .submit(GenerationRequest::ImageEdit {
                    prompt,
                    reference: ReferenceImage::Path(staged.path().to_path_buf()),
                })
                .await?;

            info!(locator = %locator, "Generated image from reference");
            Ok(TryOnResponse::GeneratedImageUrl(locator.to_string()))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub image_url: String,
}

/// GET /download_image?image_url=gs://bucket/path
pub async fn download_image(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DownloadParams>,
) -> Result<Response> {
    let asset = state.assets.fetch(&params.image_url).await.map_err(|e| {
        error!(error = %e, image_url = %params.image_url, "Error downloading image");
        e
    })?;

    let disposition = format!("attachment; filename=\"{}\"", asset.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, asset.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        asset.bytes,
    )
        .into_response())
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

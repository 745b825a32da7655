//! Google Cloud Storage over the JSON API

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::credentials::TokenSource;
use crate::error::{AppError, Result};
use crate::storage::traits::ObjectStore;

pub struct GcsStore {
    client: Client,
    endpoint: Url,
    tokens: TokenSource,
}

impl GcsStore {
    pub fn new(endpoint: &str, tokens: TokenSource) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            AppError::Internal(format!("Invalid storage endpoint '{}': {}", endpoint, e))
        })?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            tokens,
        })
    }

    /// Object names are a single path segment, so '/' is percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Storage endpoint cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn object_url(&self, bucket: &str, path: &str) -> Result<Url> {
        self.url(&["storage", "v1", "b", bucket, "o", path])
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        self.tokens
            .authorize(request)
            .await
            .map_err(|e| AppError::Storage(format!("Could not obtain credentials: {}", e)))?
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Storage request failed: {}", e)))
    }
}

async fn failure(action: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AppError::Storage(format!("{} returned {}: {}", action, status, body))
}

#[async_trait]
impl ObjectStore for GcsStore {
    fn name(&self) -> &str {
        "gcs"
    }

    async fn put(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let mut url = self.url(&["upload", "storage", "v1", "b", bucket, "o"])?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", path);

        let size = bytes.len();
        let response = self
            .send(
                self.client
                    .post(url)
                    .header(reqwest::header::CONTENT_TYPE, content_type)
                    .body(bytes),
            )
            .await?;

        if !response.status().is_success() {
            return Err(failure("Upload", response).await);
        }

        debug!(bucket = %bucket, path = %path, size = size, "Uploaded object");
        Ok(())
    }

    async fn exists(&self, bucket: &str, path: &str) -> Result<bool> {
        let response = self.send(self.client.get(self.object_url(bucket, path)?)).await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(failure("Metadata lookup", response).await),
        }
    }

    async fn get(&self, bucket: &str, path: &str) -> Result<Vec<u8>> {
        let mut url = self.object_url(bucket, path)?;
        url.query_pairs_mut().append_pair("alt", "media");

        let response = self.send(self.client.get(url)).await?;

        match response.status() {
            status if status.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| AppError::Storage(format!("Download interrupted: {}", e)))?;
                Ok(bytes.to_vec())
            }
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!("gs://{}/{}", bucket, path))),
            _ => Err(failure("Download", response).await),
        }
    }
}

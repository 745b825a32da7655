//! Bearer tokens for Google APIs.
//!
//! Token acquisition is delegated to the runtime environment: either the GCE
//! metadata server of the host, or a token injected through configuration.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::CredentialsConfig;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("metadata server returned {0}")]
    Status(StatusCode),
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Source of the `Authorization: Bearer` value attached to outgoing calls
#[derive(Clone)]
pub enum TokenSource {
    /// Fetch a fresh token from the instance metadata server per call
    Metadata { client: Client, url: String },
    Static(String),
    /// Send requests unauthenticated (emulators, local proxies)
    None,
}

impl TokenSource {
    pub fn from_config(config: &CredentialsConfig) -> Self {
        match config.mode.as_str() {
            "static" => match &config.access_token {
                Some(token) => Self::Static(token.clone()),
                None => Self::None,
            },
            "none" => Self::None,
            _ => Self::Metadata {
                client: Client::new(),
                url: config.metadata_url.clone(),
            },
        }
    }

    /// Current bearer token, if this source provides one
    pub async fn token(&self) -> Result<Option<String>, CredentialError> {
        match self {
            Self::Static(token) => Ok(Some(token.clone())),
            Self::None => Ok(None),
            Self::Metadata { client, url } => {
                let response = client
                    .get(url)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await?;

                if !response.status().is_success() {
                    return Err(CredentialError::Status(response.status()));
                }

                let token: MetadataToken = response.json().await?;
                Ok(Some(token.access_token))
            }
        }
    }

    /// Attach the bearer token, if any, to a request
    pub async fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, CredentialError> {
        Ok(match self.token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }
}

//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub scratch: ScratchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted multipart body
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Image generation backend (Vertex AI Imagen) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_provider")]
    pub provider: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_location")]
    pub location: String,
    /// Overrides the regional API root, e.g. for a proxy
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_generate_model")]
    pub generate_model: String,
    #[serde(default = "default_edit_model")]
    pub edit_model: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(default = "default_safety_setting")]
    pub safety_setting: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_backend_provider() -> String {
    "vertex".to_string()
}

fn default_location() -> String {
    "us-central1".to_string()
}

fn default_generate_model() -> String {
    "imagen-3.0-generate-002".to_string()
}

fn default_edit_model() -> String {
    "imagen-3.0-capability-001".to_string()
}

fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

fn default_safety_setting() -> String {
    "block_low_and_above".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl BackendConfig {
    /// API root used for `:predict` calls
    pub fn api_root(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com/v1", self.location),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: default_backend_provider(),
            project_id: String::new(),
            location: default_location(),
            endpoint: None,
            generate_model: default_generate_model(),
            edit_model: default_edit_model(),
            aspect_ratio: default_aspect_ratio(),
            safety_setting: default_safety_setting(),
            language: default_language(),
        }
    }
}

/// Object storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_provider")]
    pub provider: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_object_prefix")]
    pub object_prefix: String,
    #[serde(default = "default_storage_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_local_path")]
    pub local_path: String,
}

fn default_storage_provider() -> String {
    "gcs".to_string()
}

fn default_object_prefix() -> String {
    "generated_images".to_string()
}

fn default_storage_endpoint() -> String {
    "https://storage.googleapis.com".to_string()
}

fn default_local_path() -> String {
    "./object_store".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_storage_provider(),
            bucket: String::new(),
            object_prefix: default_object_prefix(),
            endpoint: default_storage_endpoint(),
            local_path: default_local_path(),
        }
    }
}

/// How bearer tokens for Google APIs are obtained
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_credentials_mode")]
    pub mode: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,
}

fn default_credentials_mode() -> String {
    "metadata".to_string()
}

fn default_metadata_url() -> String {
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"
        .to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            mode: default_credentials_mode(),
            access_token: None,
            metadata_url: default_metadata_url(),
        }
    }
}

/// Location of per-request temporary files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScratchConfig {
    #[serde(default = "default_scratch_dir")]
    pub dir: String,
}

fn default_scratch_dir() -> String {
    std::env::temp_dir().to_string_lossy().to_string()
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            dir: default_scratch_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("storage.provider", "gcs")?
            .set_default("credentials.mode", "metadata")?
            .add_source(File::with_name(path.as_ref().to_str().unwrap_or("config/default")).required(false))
            // Override with environment variables (prefixed with TRYON_)
            .add_source(
                Environment::with_prefix("TRYON")
                    .separator("__")
                    .try_parsing(true),
            )
            // Variable names used by earlier deployments
            .set_override_option("backend.project_id", std::env::var("GOOGLE_PROJECT_ID").ok())?
            .set_override_option("storage.bucket", std::env::var("GCP_BUCKET_NAME").ok())?
            .set_override_option("backend.location", std::env::var("LOCATION").ok())?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(config_error("Server port cannot be 0"));
        }

        if self.storage.bucket.trim().is_empty() {
            return Err(config_error("Storage bucket must be set"));
        }
        if self.storage.bucket.contains('/') {
            return Err(config_error(format!(
                "Storage bucket '{}' cannot contain '/'",
                self.storage.bucket
            )));
        }
        if !["gcs", "local", "memory"].contains(&self.storage.provider.as_str()) {
            return Err(config_error(format!(
                "Invalid storage provider '{}'. Must be 'gcs', 'local' or 'memory'",
                self.storage.provider
            )));
        }

        if self.backend.provider != "vertex" {
            return Err(config_error(format!(
                "Invalid backend provider '{}'. Must be 'vertex'",
                self.backend.provider
            )));
        }
        if self.backend.project_id.trim().is_empty() {
            return Err(config_error("Backend project_id must be set"));
        }

        match self.credentials.mode.as_str() {
            "metadata" | "none" => {}
            "static" if self.credentials.access_token.is_some() => {}
            "static" => {
                return Err(config_error(
                    "Credentials mode 'static' requires credentials.access_token",
                ))
            }
            other => {
                return Err(config_error(format!(
                    "Invalid credentials mode '{}'. Must be 'metadata', 'static' or 'none'",
                    other
                )))
            }
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> AppError {
    AppError::Config(config::ConfigError::Message(message.into()))
}

//! Configuration module

mod settings;

pub use settings::{
    BackendConfig, CredentialsConfig, LoggingConfig, ScratchConfig, ServerConfig, Settings,
    StorageConfig,
};

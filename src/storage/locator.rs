//! `gs://bucket/path` locators for stored assets

use std::fmt;

use crate::error::{AppError, Result};

pub const SCHEME: &str = "gs";

/// Identifies one object in the object store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageLocator {
    bucket: String,
    path: String,
}

impl StorageLocator {
    pub fn new(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into(),
        }
    }

    /// Parse a locator string, requiring the scheme and both components
    pub fn parse(locator: &str) -> Result<Self> {
        let prefix = format!("{}://", SCHEME);
        let rest = locator.strip_prefix(&prefix).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid storage locator '{}'. Must start with '{}'",
                locator, prefix
            ))
        })?;

        let (bucket, path) = rest.split_once('/').ok_or_else(|| {
            AppError::Validation(format!(
                "Storage locator '{}' has no object path",
                locator
            ))
        })?;

        if bucket.is_empty() {
            return Err(AppError::Validation(format!(
                "Storage locator '{}' has no bucket",
                locator
            )));
        }
        if path.is_empty() {
            return Err(AppError::Validation(format!(
                "Storage locator '{}' has no object path",
                locator
            )));
        }

        Ok(Self::new(bucket, path))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Lowercased extension of the object path including the dot, if any
    pub fn extension(&self) -> Option<String> {
        let file_name = self.path.rsplit('/').next().unwrap_or(&self.path);
        match file_name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(file_name[idx..].to_lowercase()),
        }
    }
}

impl fmt::Display for StorageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", SCHEME, self.bucket, self.path)
    }
}

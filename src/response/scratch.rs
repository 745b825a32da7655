//! Request-scoped temporary files

use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::fs;
use tracing::debug;

use crate::error::{AppError, Result};

/// Directory that holds per-request temporary files
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    dir: PathBuf,
}

/// A temporary file that is deleted when dropped
#[derive(Debug)]
pub struct ScratchFile {
    path: TempPath,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file back
    pub async fn read(&self) -> Result<Vec<u8>> {
        fs::read(self.path()).await.map_err(AppError::Io)
    }
}

impl ScratchSpace {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `bytes` to a fresh uniquely named file.
    ///
    /// The file is owned by the returned guard before anything is written, so
    /// it is removed on every exit path.
    pub async fn persist(&self, prefix: &str, suffix: &str, bytes: &[u8]) -> Result<ScratchFile> {
        fs::create_dir_all(&self.dir).await?;

        let path = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(&self.dir)?
            .into_temp_path();
        let file = ScratchFile { path };

        fs::write(file.path(), bytes).await?;
        debug!(path = ?file.path(), size = bytes.len(), "Wrote scratch file");

        Ok(file)
    }
}

/// Extension suffix (".png") taken from an uploaded file name, if it is safe
pub fn suffix_from_file_name(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

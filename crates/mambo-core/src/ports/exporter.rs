//! Audio export port — the "save to disk" capability.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::AudioSource;

/// Errors from exporting an audio artifact.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// The audio bytes could not be fetched from the locator.
    #[error("download failed: {0}")]
    Fetch(String),

    /// The destination file could not be written.
    #[error("write failed: {0}")]
    Write(String),
}

/// Port for persisting an audio artifact to user-chosen storage outside the
/// application's own data directory.
#[async_trait]
pub trait AudioExporter: Send + Sync {
    /// Resolve `source` to bytes and write them to `destination` in whole.
    async fn export(&self, source: &AudioSource, destination: &Path) -> Result<(), ExportError>;
}

//! HTTP-backed audio exporter: fetch the locator, write the file in whole.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use mambo_core::domain::AudioSource;
use mambo_core::ports::{AudioExporter, ExportError};

use crate::config::ApiConfig;
use crate::http::{HttpBackend, ReqwestBackend};

/// Exporter for audio locators that are fetchable URLs.
pub struct HttpAudioExporter {
    backend: Arc<dyn HttpBackend>,
}

impl HttpAudioExporter {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            backend: Arc::new(ReqwestBackend::new(config)),
        }
    }

    pub fn with_backend(backend: Arc<dyn HttpBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AudioExporter for HttpAudioExporter {
    async fn export(&self, source: &AudioSource, destination: &Path) -> Result<(), ExportError> {
        let url = Url::parse(source.as_str())
            .map_err(|e| ExportError::Fetch(format!("not a fetchable locator: {e}")))?;

        let bytes = self
            .backend
            .get_bytes(&url)
            .await
            .map_err(|e| ExportError::Fetch(e.to_string()))?;

        tokio::fs::write(destination, &bytes)
            .await
            .map_err(|e| ExportError::Write(e.to_string()))?;

        tracing::debug!(bytes = bytes.len(), destination = %destination.display(), "exported audio");
        Ok(())
    }
}

/// Suggest a file name for a locator, mirroring what the service serves.
pub fn suggested_file_name(source: &AudioSource) -> String {
    source
        .as_str()
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("audio.mp3")
        .to_string()
}

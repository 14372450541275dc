//! HTTP backend abstraction for the Mambo TTS API.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest. No retries anywhere — a failed request is surfaced to the
//! user immediately, and re-trying is an explicit user action.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;

/// Transport-level errors, prior to any interpretation of the payload.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    /// DNS, TLS, timeout, connection reset, and friends.
    #[error("{0}")]
    Transport(String),

    /// The body arrived but was not decodable as the expected shape.
    #[error("{0}")]
    Decode(String),
}

/// A JSON response together with the HTTP status it arrived with.
///
/// The service reports errors inside the JSON envelope even on non-2xx
/// statuses, so the body is decoded regardless and the caller interprets
/// both together.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Trait for HTTP backends.
///
/// This is an implementation detail — external code talks to
/// [`MamboClient`](crate::MamboClient) through the core port traits.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET a URL with optional bearer auth and decode the body as JSON.
    async fn get_json(&self, url: &Url, bearer: Option<&str>) -> Result<JsonResponse, HttpError>;

    /// GET a URL and return the raw bytes (audio artifact download).
    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, HttpError>;
}

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json(&self, url: &Url, bearer: Option<&str>) -> Result<JsonResponse, HttpError> {
        let mut request = self.client.get(url.as_str());
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| HttpError::Decode(e.to_string()))?;

        Ok(JsonResponse { status, body })
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, HttpError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Transport(format!(
                "unexpected status {status} fetching {url}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

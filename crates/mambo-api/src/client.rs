//! Synthesis client for the Mambo TTS API.
//!
//! One `GET /apis/mbAIsc` round trip per synthesis call. The service wraps
//! results in a JSON envelope: `code` (200 on success), `msg` (error
//! cause), and `url` (the audio locator). Errors are reported inside the
//! envelope even on non-2xx HTTP statuses.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use mambo_core::domain::AudioSource;
use mambo_core::ports::{SpeechSynthesizer, SynthesisError, SynthesisRequest};

use crate::config::ApiConfig;
use crate::http::{HttpBackend, HttpError, JsonResponse, ReqwestBackend};

/// Path of the synthesis endpoint, relative to the base URL.
const SYNTHESIZE_PATH: &str = "apis/mbAIsc";

/// Envelope code the service uses for success.
const CODE_OK: i64 = 200;

/// Client for the remote synthesis service.
pub struct MamboClient {
    backend: Arc<dyn HttpBackend>,
    config: ApiConfig,
}

impl MamboClient {
    /// Create a client with the production reqwest backend.
    pub fn new(config: ApiConfig) -> Self {
        let backend = Arc::new(ReqwestBackend::new(&config));
        Self { backend, config }
    }

    /// Create a client with an injected backend (used by tests).
    pub fn with_backend(config: ApiConfig, backend: Arc<dyn HttpBackend>) -> Self {
        Self { backend, config }
    }

    fn synthesize_url(&self, request: &SynthesisRequest) -> Result<Url, SynthesisError> {
        let mut url = self
            .config
            .base_url
            .join(SYNTHESIZE_PATH)
            .map_err(|e| SynthesisError::Network(format!("invalid endpoint URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("text", &request.text)
            .append_pair("format", request.format.as_str());
        Ok(url)
    }

    fn interpret(response: JsonResponse) -> Result<AudioSource, SynthesisError> {
        let message = response
            .body
            .get("msg")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
            .to_string();

        // Auth failures get their own kind so the UI can say so plainly.
        if response.status == 401 || response.status == 403 {
            return Err(SynthesisError::InvalidCredential(message));
        }

        let code = response.body.get("code").and_then(|v| v.as_i64()).unwrap_or(0);
        if code != CODE_OK {
            return Err(SynthesisError::Rejected { code, message });
        }

        response
            .body
            .get("url")
            .and_then(|v| v.as_str())
            .map(AudioSource::from)
            .ok_or_else(|| {
                SynthesisError::MalformedResponse("response missing url field".to_string())
            })
    }
}

#[async_trait]
impl SpeechSynthesizer for MamboClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<AudioSource, SynthesisError> {
        let url = self.synthesize_url(&request)?;
        tracing::debug!(endpoint = %url.path(), format = %request.format, "calling synthesis service");

        let response = self
            .backend
            .get_json(&url, Some(&request.credential))
            .await
            .map_err(|e| match e {
                HttpError::Transport(msg) => SynthesisError::Network(msg),
                HttpError::Decode(msg) => SynthesisError::MalformedResponse(msg),
            })?;

        Self::interpret(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeBackend;
    use mambo_core::domain::AudioFormat;
    use serde_json::json;

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            credential: "tok_abc123".to_string(),
            format: AudioFormat::Mp3,
        }
    }

    fn client(backend: FakeBackend) -> (MamboClient, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        let client = MamboClient::with_backend(
            ApiConfig::default(),
            Arc::clone(&backend) as Arc<dyn HttpBackend>,
        );
        (client, backend)
    }

    #[tokio::test]
    async fn success_returns_the_audio_url() {
        let (client, backend) = client(FakeBackend::json(
            200,
            json!({"code": 200, "msg": "ok", "url": "https://cdn.example.com/out.mp3"}),
        ));

        let source = client.synthesize(request("你好世界")).await.unwrap();
        assert_eq!(source, AudioSource::from("https://cdn.example.com/out.mp3"));

        let requests = backend.requests.lock().unwrap();
        let (url, bearer) = &requests[0];
        assert!(url.contains("/apis/mbAIsc"));
        assert!(url.contains("format=mp3"));
        assert_eq!(bearer.as_deref(), Some("tok_abc123"));
    }

    #[tokio::test]
    async fn text_is_query_encoded() {
        let (client, backend) = client(FakeBackend::json(
            200,
            json!({"code": 200, "url": "https://cdn.example.com/out.mp3"}),
        ));

        client.synthesize(request("hello world")).await.unwrap();
        let requests = backend.requests.lock().unwrap();
        assert!(requests[0].0.contains("text=hello+world"));
    }

    #[tokio::test]
    async fn envelope_error_code_is_a_rejection() {
        let (client, _) = client(FakeBackend::json(
            200,
            json!({"code": 429, "msg": "quota exceeded"}),
        ));

        let err = client.synthesize(request("hello")).await.unwrap_err();
        match err {
            SynthesisError::Rejected { code, message } => {
                assert_eq!(code, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn auth_status_maps_to_invalid_credential() {
        let (client, _) = client(FakeBackend::json(
            401,
            json!({"code": 401, "msg": "invalid credential"}),
        ));

        let err = client.synthesize(request("hello")).await.unwrap_err();
        assert!(matches!(err, SynthesisError::InvalidCredential(msg) if msg == "invalid credential"));
    }

    #[tokio::test]
    async fn missing_url_is_a_malformed_response() {
        let (client, _) = client(FakeBackend::json(200, json!({"code": 200, "msg": "ok"})));

        let err = client.synthesize(request("hello")).await.unwrap_err();
        assert!(matches!(err, SynthesisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn transport_failure_maps_to_network_error() {
        let (client, _) = client(FakeBackend::transport_error("connection refused"));

        let err = client.synthesize(request("hello")).await.unwrap_err();
        assert!(matches!(err, SynthesisError::Network(msg) if msg.contains("connection refused")));
    }

    #[tokio::test]
    async fn exactly_one_request_per_call_no_retries() {
        let (client, backend) = client(FakeBackend::transport_error("timeout"));

        let _ = client.synthesize(request("hello")).await;
        assert_eq!(backend.requests.lock().unwrap().len(), 1);
    }
}

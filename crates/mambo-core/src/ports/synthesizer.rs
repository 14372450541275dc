//! Speech synthesizer port definition.
//!
//! One remote round trip per call, no retries, no state side effects.
//! Retry policy, if any, belongs to the caller (here: none — a failure is
//! surfaced to the user immediately).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AudioFormat, AudioSource};

/// A dispatch-time snapshot of everything one synthesis call needs.
///
/// Text, credential, and format are captured when the request is dispatched
/// so that edits made while the request is in flight cannot leak into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub credential: String,
    pub format: AudioFormat,
}

/// Errors a synthesis call can fail with.
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("network error: {0}")]
    Network(String),

    /// The service refused the supplied credential.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// The service answered but rejected the request.
    #[error("service rejected request (code {code}): {message}")]
    Rejected { code: i64, message: String },

    /// The response arrived but could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Port for the remote text-to-speech service.
///
/// Implementations must not touch session state or history — they perform
/// the network call and nothing else.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Convert text to speech, returning an opaque audio locator.
    ///
    /// `request.text` and `request.credential` are non-empty after trimming;
    /// the session controller rejects before calling, so a violation here is
    /// a caller bug rather than a runtime failure.
    async fn synthesize(&self, request: SynthesisRequest) -> Result<AudioSource, SynthesisError>;
}

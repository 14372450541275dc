//! HTTP adapter for the Mambo TTS service.
//!
//! Implements the [`SpeechSynthesizer`](mambo_core::ports::SpeechSynthesizer)
//! and [`AudioExporter`](mambo_core::ports::AudioExporter) ports over the
//! remote API. The HTTP layer sits behind the [`HttpBackend`] trait so tests
//! can inject canned responses.

pub mod client;
pub mod config;
pub mod exporter;
pub mod http;

pub use client::MamboClient;
pub use config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use exporter::{HttpAudioExporter, suggested_file_name};
pub use http::{HttpBackend, HttpError, JsonResponse, ReqwestBackend};

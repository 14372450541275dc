//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No HTTP, filesystem, or audio-hardware types in any signature
//! - Traits are minimal and intent-based
//! - Every error kind is named so that tests can assert it was reached

pub mod exporter;
pub mod key_value;
pub mod link_opener;
pub mod playback;
pub mod synthesizer;

use thiserror::Error;

// Re-export port traits and errors for convenience
pub use exporter::{AudioExporter, ExportError};
pub use key_value::{KEY_CREDENTIAL, KEY_FORMAT, KEY_HISTORY, KeyValueStore, StoreError};
pub use link_opener::LinkOpener;
pub use playback::{DeviceEvent, PlaybackDevice, PlaybackError};
pub use synthesizer::{SpeechSynthesizer, SynthesisError, SynthesisRequest};

/// Core error type for semantic domain errors.
///
/// Synthesis and export failures never cross the session controller
/// boundary (they become status messages); this type exists for adapters
/// that call ports directly and need to map failures to exit codes or
/// HTTP statuses.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Durable store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Synthesis call failed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// Playback device operation failed.
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// Audio export failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Validation error (invalid input).
    #[error("validation error: {0}")]
    Validation(String),
}

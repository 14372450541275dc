//! Core domain types, ports, and services for the Mambo TTS client.
//!
//! This crate is pure: no HTTP, no filesystem, no audio hardware. Adapters
//! implement the port traits and compose a [`SessionController`] at their
//! composition root.

pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    AudioFormat, AudioSource, IdMinter, RecordId, SessionState, StatusLine, StoredPreferences,
    SynthesisRecord, UnknownFormat,
};
pub use ports::{
    AudioExporter, CoreError, DeviceEvent, ExportError, KeyValueStore, LinkOpener, PlaybackDevice,
    PlaybackError, SpeechSynthesizer, StoreError, SynthesisError, SynthesisRequest,
};
pub use services::{
    HISTORY_CAP, HistoryService, PlaybackArbiter, PlaybackState, PreferenceService,
    SessionController, SessionDeps,
};

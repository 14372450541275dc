//! Playback device port definition.
//!
//! The device is a single shared resource. Only the playback arbiter may
//! command it — no other code path issues load/play/pause, which prevents
//! two call sites from racing conflicting commands to the same device.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::AudioSource;

/// Errors from the underlying playback device.
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    /// The device could not fetch or decode the source.
    #[error("failed to load audio source: {0}")]
    Load(String),

    /// The device rejected a play/pause command.
    #[error("playback device error: {0}")]
    Device(String),
}

/// Port for the single shared playback device.
///
/// `load` resolves only once the device reports the new source ready, so a
/// `play` issued after it cannot race a still-loading source.
#[async_trait]
pub trait PlaybackDevice: Send + Sync {
    /// Swap the active source, waiting for the device's readiness signal.
    async fn load(&self, source: &AudioSource) -> Result<(), PlaybackError>;

    /// Start (or resume) playback of the loaded source.
    async fn play(&self) -> Result<(), PlaybackError>;

    /// Pause playback, keeping the loaded source.
    async fn pause(&self) -> Result<(), PlaybackError>;
}

/// State-change notifications originating from the device itself.
///
/// Native device controls can start, pause, or end playback without the
/// application UI being involved; adapters forward these so the arbiter can
/// reconcile its state instead of trusting only its own toggle calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The current source played to its end.
    Ended,
    /// Playback was paused outside the application UI.
    Paused,
    /// Playback was resumed outside the application UI.
    Resumed,
}

//! Playback arbiter — mutual exclusion over the single playback device.
//!
//! Owns "which audio source is the active player target" and "is it
//! playing". At most one record is in the playing state at any instant:
//! selecting a different record while one plays stops the previous one
//! before the new one starts. The arbiter is the only component allowed to
//! command the device, and it reconciles state changes that originate from
//! native device controls rather than the application UI.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{AudioSource, RecordId, SynthesisRecord};
use crate::ports::{PlaybackDevice, PlaybackError};

/// Playback-related session state, owned here rather than by the session
/// controller. The controller reads it through snapshots and never writes
/// it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    /// The audio source the session currently presents as "current".
    pub current_source: Option<AudioSource>,
    /// The record whose audio the device is playing (or paused on).
    pub playing: Option<RecordId>,
    /// Whether the device is actually emitting audio right now.
    pub is_playing: bool,
}

/// Internal state: the public snapshot plus the source the device last
/// loaded, which may lag `current_source` (adoption does not load).
#[derive(Debug, Default)]
struct ArbiterState {
    public: PlaybackState,
    loaded: Option<AudioSource>,
}

/// Serializes all access to the shared playback device.
pub struct PlaybackArbiter {
    device: Arc<dyn PlaybackDevice>,
    state: Mutex<ArbiterState>,
}

impl PlaybackArbiter {
    pub fn new(device: Arc<dyn PlaybackDevice>) -> Self {
        Self {
            device,
            state: Mutex::new(ArbiterState::default()),
        }
    }

    /// Toggle playback of `record`.
    ///
    /// - Same record, playing: pause and leave the playing state.
    /// - Same record, paused externally: resume.
    /// - Different record (or nothing playing): load the source first if it
    ///   differs from what the device holds — the await on `load` is the
    ///   readiness gate — then start playback. Whatever was playing before
    ///   is implicitly stopped by the source swap.
    ///
    /// The state lock is held across the device calls, so commands to the
    /// shared device never interleave.
    pub async fn toggle_play(&self, record: &SynthesisRecord) -> Result<(), PlaybackError> {
        let mut state = self.state.lock().await;

        if state.public.playing == Some(record.id) {
            if state.public.is_playing {
                self.device.pause().await?;
                state.public.playing = None;
                state.public.is_playing = false;
            } else {
                // Paused via native controls; resume rather than stop.
                self.device.play().await?;
                state.public.is_playing = true;
            }
            return Ok(());
        }

        if state.loaded.as_ref() != Some(&record.audio_source) {
            self.device.load(&record.audio_source).await?;
            state.loaded = Some(record.audio_source.clone());
        }
        self.device.play().await?;

        state.public.current_source = Some(record.audio_source.clone());
        state.public.playing = Some(record.id);
        state.public.is_playing = true;
        Ok(())
    }

    /// Adopt a freshly synthesized source as current, stopping any active
    /// playback. The device is not loaded until the user plays something.
    pub async fn set_current_source(&self, source: AudioSource) {
        let mut state = self.state.lock().await;
        if state.public.is_playing {
            if let Err(err) = self.device.pause().await {
                tracing::warn!(%err, "failed to pause device while adopting new source");
            }
        }
        state.public.playing = None;
        state.public.is_playing = false;
        state.public.current_source = Some(source);
    }

    /// Stop playback if `id` is the playing record (used when that record
    /// is deleted from history).
    pub async fn stop_if_playing(&self, id: RecordId) {
        let mut state = self.state.lock().await;
        if state.public.playing == Some(id) {
            if state.public.is_playing {
                if let Err(err) = self.device.pause().await {
                    tracing::warn!(%err, "failed to pause device while stopping playback");
                }
            }
            state.public.playing = None;
            state.public.is_playing = false;
        }
    }

    /// Stop any in-progress playback unconditionally.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if state.public.is_playing {
            if let Err(err) = self.device.pause().await {
                tracing::warn!(%err, "failed to pause device while stopping playback");
            }
        }
        state.public.playing = None;
        state.public.is_playing = false;
    }

    /// The device's end-of-stream signal fired. Clears the playing record
    /// regardless of which record triggered it.
    pub async fn on_playback_ended(&self) {
        let mut state = self.state.lock().await;
        state.public.playing = None;
        state.public.is_playing = false;
    }

    /// Playback was paused by native device controls; reconcile.
    pub async fn on_external_pause(&self) {
        let mut state = self.state.lock().await;
        state.public.is_playing = false;
    }

    /// Playback was resumed by native device controls; reconcile.
    pub async fn on_external_play(&self) {
        let mut state = self.state.lock().await;
        state.public.is_playing = true;
    }

    /// Snapshot of the playback state.
    pub async fn snapshot(&self) -> PlaybackState {
        self.state.lock().await.public.clone()
    }

    pub async fn current_source(&self) -> Option<AudioSource> {
        self.state.lock().await.public.current_source.clone()
    }

    pub async fn currently_playing(&self) -> Option<RecordId> {
        self.state.lock().await.public.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex as StdMutex;

    /// Records every command issued to it, in order.
    #[derive(Default)]
    struct LoggingDevice {
        commands: StdMutex<Vec<String>>,
    }

    impl LoggingDevice {
        fn log(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlaybackDevice for LoggingDevice {
        async fn load(&self, source: &AudioSource) -> Result<(), PlaybackError> {
            self.commands.lock().unwrap().push(format!("load {source}"));
            Ok(())
        }

        async fn play(&self) -> Result<(), PlaybackError> {
            self.commands.lock().unwrap().push("play".to_string());
            Ok(())
        }

        async fn pause(&self) -> Result<(), PlaybackError> {
            self.commands.lock().unwrap().push("pause".to_string());
            Ok(())
        }
    }

    fn record(id: i64, source: &str) -> SynthesisRecord {
        SynthesisRecord {
            id: RecordId(id),
            text: format!("text {id}"),
            audio_source: AudioSource::from(source),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn toggle_starts_then_stops_the_same_record() {
        let device = Arc::new(LoggingDevice::default());
        let arbiter = PlaybackArbiter::new(Arc::clone(&device) as Arc<dyn PlaybackDevice>);
        let rec = record(1, "https://cdn.example.com/1.mp3");

        arbiter.toggle_play(&rec).await.unwrap();
        let snap = arbiter.snapshot().await;
        assert_eq!(snap.playing, Some(RecordId(1)));
        assert!(snap.is_playing);
        assert_eq!(snap.current_source, Some(rec.audio_source.clone()));

        arbiter.toggle_play(&rec).await.unwrap();
        let snap = arbiter.snapshot().await;
        assert_eq!(snap.playing, None);
        assert!(!snap.is_playing);

        assert_eq!(
            device.log(),
            vec!["load https://cdn.example.com/1.mp3", "play", "pause"]
        );
    }

    #[tokio::test]
    async fn switching_records_stops_the_previous_one_first() {
        let device = Arc::new(LoggingDevice::default());
        let arbiter = PlaybackArbiter::new(Arc::clone(&device) as Arc<dyn PlaybackDevice>);
        let a = record(1, "https://cdn.example.com/a.mp3");
        let b = record(2, "https://cdn.example.com/b.mp3");

        arbiter.toggle_play(&a).await.unwrap();
        arbiter.toggle_play(&b).await.unwrap();

        let snap = arbiter.snapshot().await;
        // At most one record plays; A left the playing state before B entered it.
        assert_eq!(snap.playing, Some(RecordId(2)));
        assert_eq!(snap.current_source, Some(b.audio_source.clone()));

        // The device loaded B before playing it (readiness gating).
        assert_eq!(
            device.log(),
            vec![
                "load https://cdn.example.com/a.mp3",
                "play",
                "load https://cdn.example.com/b.mp3",
                "play",
            ]
        );
    }

    #[tokio::test]
    async fn ended_signal_clears_the_playing_record() {
        let device = Arc::new(LoggingDevice::default());
        let arbiter = PlaybackArbiter::new(device);
        let rec = record(1, "https://cdn.example.com/1.mp3");

        arbiter.toggle_play(&rec).await.unwrap();
        arbiter.on_playback_ended().await;

        let snap = arbiter.snapshot().await;
        assert_eq!(snap.playing, None);
        assert!(!snap.is_playing);
        // Current source survives end-of-stream; the record can be replayed.
        assert_eq!(snap.current_source, Some(rec.audio_source));
    }

    #[tokio::test]
    async fn external_pause_then_toggle_resumes() {
        let device = Arc::new(LoggingDevice::default());
        let arbiter = PlaybackArbiter::new(Arc::clone(&device) as Arc<dyn PlaybackDevice>);
        let rec = record(1, "https://cdn.example.com/1.mp3");

        arbiter.toggle_play(&rec).await.unwrap();
        arbiter.on_external_pause().await;
        assert!(!arbiter.snapshot().await.is_playing);
        // Still the selected record — a toggle resumes instead of reloading.
        assert_eq!(arbiter.currently_playing().await, Some(RecordId(1)));

        arbiter.toggle_play(&rec).await.unwrap();
        let snap = arbiter.snapshot().await;
        assert!(snap.is_playing);
        assert_eq!(snap.playing, Some(RecordId(1)));
        assert_eq!(device.log(), vec!["load https://cdn.example.com/1.mp3", "play", "play"]);
    }

    #[tokio::test]
    async fn external_play_reconciles_state() {
        let device = Arc::new(LoggingDevice::default());
        let arbiter = PlaybackArbiter::new(device);
        arbiter.on_external_play().await;
        assert!(arbiter.snapshot().await.is_playing);
    }

    #[tokio::test]
    async fn stop_if_playing_only_affects_the_playing_record() {
        let device = Arc::new(LoggingDevice::default());
        let arbiter = PlaybackArbiter::new(device);
        let rec = record(1, "https://cdn.example.com/1.mp3");

        arbiter.toggle_play(&rec).await.unwrap();
        arbiter.stop_if_playing(RecordId(99)).await;
        assert_eq!(arbiter.currently_playing().await, Some(RecordId(1)));

        arbiter.stop_if_playing(RecordId(1)).await;
        assert_eq!(arbiter.currently_playing().await, None);
    }

    #[tokio::test]
    async fn adopting_a_new_source_stops_playback() {
        let device = Arc::new(LoggingDevice::default());
        let arbiter = PlaybackArbiter::new(Arc::clone(&device) as Arc<dyn PlaybackDevice>);
        let rec = record(1, "https://cdn.example.com/1.mp3");

        arbiter.toggle_play(&rec).await.unwrap();
        arbiter
            .set_current_source(AudioSource::from("https://cdn.example.com/new.mp3"))
            .await;

        let snap = arbiter.snapshot().await;
        assert_eq!(snap.playing, None);
        assert!(!snap.is_playing);
        assert_eq!(
            snap.current_source,
            Some(AudioSource::from("https://cdn.example.com/new.mp3"))
        );
    }
}

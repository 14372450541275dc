//! Session controller — the orchestrator for the synthesis workflow.
//!
//! Owns the transient [`SessionState`] (including the single-flight
//! generation guard) and composes the history, preference, and playback
//! services. This is the only component allowed to mutate more than one of
//! them in a single operation, and the boundary past which no failure
//! propagates: adapters observe [`StatusLine`], never errors, for synthesis
//! and export outcomes.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::{
    AudioFormat, AudioSource, IdMinter, RecordId, SessionState, StatusLine, SynthesisRecord,
};
use crate::ports::{
    AudioExporter, KeyValueStore, PlaybackDevice, SpeechSynthesizer, SynthesisRequest,
};

use super::arbiter::{PlaybackArbiter, PlaybackState};
use super::history::HistoryService;
use super::preferences::PreferenceService;

/// External capabilities the controller is composed from.
///
/// Constructed at the adapter's composition root with concrete
/// implementations of the ports.
pub struct SessionDeps {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub exporter: Arc<dyn AudioExporter>,
    pub device: Arc<dyn PlaybackDevice>,
    pub store: Arc<dyn KeyValueStore>,
}

/// The synthesis session manager.
pub struct SessionController {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    exporter: Arc<dyn AudioExporter>,
    history: HistoryService,
    preferences: PreferenceService,
    arbiter: PlaybackArbiter,
    ids: IdMinter,
    state: Mutex<SessionState>,
}

impl SessionController {
    /// Compose a controller from its dependencies. Call
    /// [`load`](Self::load) once at startup to hydrate durable state.
    pub fn new(deps: SessionDeps) -> Self {
        Self {
            synthesizer: deps.synthesizer,
            exporter: deps.exporter,
            history: HistoryService::new(Arc::clone(&deps.store)),
            preferences: PreferenceService::new(deps.store),
            arbiter: PlaybackArbiter::new(deps.device),
            ids: IdMinter::new(),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Hydrate history and preferences from durable storage. Corrupt or
    /// missing data degrades to empty/default state, never an error.
    pub async fn load(&self) {
        self.history.load().await;
        let prefs = self.preferences.load().await;

        let mut state = self.state.lock().await;
        if let Some(credential) = prefs.credential {
            state.credential = credential;
        }
        state.preferred_format = prefs.format;
    }

    // ── State setters ──────────────────────────────────────────────

    /// Replace the draft input text.
    pub async fn update_input_text(&self, text: &str) {
        self.state.lock().await.input_text = text.to_string();
    }

    /// Replace the credential, then persist it. Two ordered steps: the
    /// state write happens even when persistence fails.
    pub async fn update_credential(&self, credential: &str) {
        self.state.lock().await.credential = credential.to_string();
        if let Err(err) = self.preferences.save_credential(credential).await {
            tracing::warn!(%err, "failed to persist credential");
        }
    }

    /// Replace the preferred format, then persist it.
    pub async fn update_format(&self, format: AudioFormat) {
        self.state.lock().await.preferred_format = format;
        if let Err(err) = self.preferences.save_format(format).await {
            tracing::warn!(%err, "failed to persist format");
        }
    }

    // ── Generation ─────────────────────────────────────────────────

    /// True iff trimmed text and trimmed credential are non-empty and no
    /// generation is in flight. Gates [`generate`](Self::generate).
    pub async fn can_generate(&self) -> bool {
        self.state.lock().await.can_generate()
    }

    /// Run one synthesis round trip.
    ///
    /// A no-op unless [`can_generate`](Self::can_generate) holds. The guard
    /// is checked and set under a single lock acquisition before the
    /// request is dispatched, so a second `generate` cannot slip in between
    /// check and dispatch. Text, credential, and format are snapshotted at
    /// dispatch time — edits made while the request is in flight do not
    /// affect it. `is_generating` returns to false on every path.
    pub async fn generate(&self) {
        let request = {
            let mut state = self.state.lock().await;
            if !state.can_generate() {
                return;
            }
            state.is_generating = true;
            state.last_status = StatusLine::None;
            SynthesisRequest {
                text: state.input_text.clone(),
                credential: state.credential.clone(),
                format: state.preferred_format,
            }
        };

        tracing::debug!(chars = request.text.chars().count(), format = %request.format, "dispatching synthesis request");
        let outcome = self.synthesizer.synthesize(request.clone()).await;

        let status = match outcome {
            Ok(source) => {
                self.adopt_result(&request, source).await;
                StatusLine::Success("synthesis complete".to_string())
            }
            Err(err) => {
                tracing::debug!(%err, "synthesis failed");
                StatusLine::Failure(err.to_string())
            }
        };

        let mut state = self.state.lock().await;
        state.last_status = status;
        state.is_generating = false;
    }

    /// Success path: adopt the new source, record it in history, and
    /// persist the credential/format that produced it. Persistence
    /// failures are logged and swallowed.
    async fn adopt_result(&self, request: &SynthesisRequest, source: AudioSource) {
        self.arbiter.set_current_source(source.clone()).await;

        let record = SynthesisRecord {
            id: self.ids.mint(),
            text: request.text.clone(),
            audio_source: source,
            created_at: Utc::now(),
        };
        if let Err(err) = self.history.prepend(record).await {
            tracing::warn!(%err, "failed to persist history");
        }
        if let Err(err) = self.preferences.save_credential(&request.credential).await {
            tracing::warn!(%err, "failed to persist credential");
        }
        if let Err(err) = self.preferences.save_format(request.format).await {
            tracing::warn!(%err, "failed to persist format");
        }
    }

    // ── Download ───────────────────────────────────────────────────

    /// Export a record's audio (or the current audio when `record_id` is
    /// `None`) to `destination`. A no-op when nothing is resolvable; an
    /// export failure becomes a status message and changes nothing else.
    pub async fn download(&self, record_id: Option<RecordId>, destination: &Path) {
        let source = match record_id {
            Some(id) => self.history.get(id).await.map(|r| r.audio_source),
            None => self.arbiter.current_source().await,
        };
        let Some(source) = source else {
            tracing::debug!("download requested with no resolvable audio source");
            return;
        };

        let status = match self.exporter.export(&source, destination).await {
            Ok(()) => StatusLine::Success(format!("saved audio to {}", destination.display())),
            Err(err) => StatusLine::Failure(err.to_string()),
        };
        self.state.lock().await.last_status = status;
    }

    // ── History ────────────────────────────────────────────────────

    /// Remove a record; if it was the playing record, playback stops too.
    pub async fn delete_history_item(&self, id: RecordId) {
        match self.history.remove_by_id(id).await {
            Ok(true) => self.arbiter.stop_if_playing(id).await,
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(%err, "failed to persist history after delete");
                self.arbiter.stop_if_playing(id).await;
            }
        }
    }

    /// Empty the history and stop any in-progress playback.
    pub async fn clear_history(&self) {
        if let Err(err) = self.history.clear().await {
            tracing::warn!(%err, "failed to persist cleared history");
        }
        self.arbiter.stop().await;
    }

    /// All history records, newest first.
    pub async fn history_records(&self) -> Vec<SynthesisRecord> {
        self.history.records().await
    }

    /// Look up one history record.
    pub async fn history_record(&self, id: RecordId) -> Option<SynthesisRecord> {
        self.history.get(id).await
    }

    // ── Playback delegation ────────────────────────────────────────

    /// Toggle playback of a history record. Unknown ids are a no-op; a
    /// device failure becomes a status message.
    pub async fn toggle_play(&self, id: RecordId) {
        let Some(record) = self.history.get(id).await else {
            tracing::debug!(%id, "toggle requested for unknown record");
            return;
        };
        if let Err(err) = self.arbiter.toggle_play(&record).await {
            self.state.lock().await.last_status = StatusLine::Failure(err.to_string());
        }
    }

    /// Forwarded from the device's end-of-stream signal. Independent of the
    /// generation state machine: never touches `is_generating` or history.
    pub async fn on_playback_ended(&self) {
        self.arbiter.on_playback_ended().await;
    }

    /// Forwarded when native device controls pause playback.
    pub async fn on_external_pause(&self) {
        self.arbiter.on_external_pause().await;
    }

    /// Forwarded when native device controls resume playback.
    pub async fn on_external_play(&self) {
        self.arbiter.on_external_play().await;
    }

    // ── Snapshots for adapters ─────────────────────────────────────

    pub async fn status(&self) -> StatusLine {
        self.state.lock().await.last_status.clone()
    }

    pub async fn is_generating(&self) -> bool {
        self.state.lock().await.is_generating
    }

    pub async fn session_state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn playback_state(&self) -> PlaybackState {
        self.arbiter.snapshot().await
    }

    pub async fn current_audio_source(&self) -> Option<AudioSource> {
        self.arbiter.current_source().await
    }

    pub async fn currently_playing(&self) -> Option<RecordId> {
        self.arbiter.currently_playing().await
    }
}

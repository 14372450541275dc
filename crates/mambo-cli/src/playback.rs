//! Rodio-backed playback device on a dedicated audio thread.
//!
//! `rodio::OutputStream` is `!Send` on some platforms, so it is confined to
//! one OS thread and commanded over a channel; [`RodioPlaybackDevice`] is
//! the `Send + Sync` proxy the playback arbiter holds. End-of-stream is
//! reported through a [`DeviceEvent`] channel that the command loop forwards
//! to the session controller.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::{mpsc::UnboundedReceiver, mpsc::UnboundedSender, oneshot};
use url::Url;

use mambo_api::HttpBackend;
use mambo_core::domain::AudioSource;
use mambo_core::ports::{DeviceEvent, PlaybackDevice, PlaybackError};

/// A command sent from the async side to the audio thread.
enum AudioCommand {
    /// Swap in a new source (already fetched to bytes) and prepare a sink.
    Load {
        bytes: Vec<u8>,
        reply: oneshot::Sender<Result<(), PlaybackError>>,
    },
    /// Start or resume playback of the loaded source.
    Play {
        reply: oneshot::Sender<Result<(), PlaybackError>>,
    },
    /// Pause playback, keeping the loaded source.
    Pause {
        reply: oneshot::Sender<Result<(), PlaybackError>>,
    },
    /// Shut down the audio thread, releasing the output stream.
    Shutdown,
}

/// `Send + Sync` handle to the dedicated audio thread.
pub struct RodioPlaybackDevice {
    backend: Arc<dyn HttpBackend>,
    cmd_tx: mpsc::Sender<AudioCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl RodioPlaybackDevice {
    /// Spawn the audio thread and return the device handle plus the
    /// receiver for device-originated events.
    ///
    /// Fails when no audio output device is available; callers may fall
    /// back to a null device so non-playback commands keep working.
    pub fn spawn(
        backend: Arc<dyn HttpBackend>,
    ) -> Result<(Self, UnboundedReceiver<DeviceEvent>), PlaybackError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), PlaybackError>>();
        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();

        let thread = thread::Builder::new()
            .name("mambo-audio".into())
            .spawn(move || run(&cmd_rx, &init_tx, &event_tx))
            .map_err(|e| PlaybackError::Device(format!("failed to spawn audio thread: {e}")))?;

        init_rx
            .recv()
            .map_err(|_| PlaybackError::Device("audio thread died during init".to_string()))??;

        Ok((
            Self {
                backend,
                cmd_tx,
                thread: Some(thread),
            },
            event_rx,
        ))
    }

    async fn send(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<(), PlaybackError>>) -> AudioCommand,
    ) -> Result<(), PlaybackError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .map_err(|_| PlaybackError::Device("audio thread died".to_string()))?;
        rx.await
            .map_err(|_| PlaybackError::Device("audio thread died".to_string()))?
    }

    /// Resolve a locator to bytes: fetch URLs, read local paths.
    async fn fetch(&self, source: &AudioSource) -> Result<Vec<u8>, PlaybackError> {
        if let Ok(url) = Url::parse(source.as_str()) {
            if matches!(url.scheme(), "http" | "https") {
                return self
                    .backend
                    .get_bytes(&url)
                    .await
                    .map_err(|e| PlaybackError::Load(e.to_string()));
            }
        }
        tokio::fs::read(source.as_str())
            .await
            .map_err(|e| PlaybackError::Load(e.to_string()))
    }
}

#[async_trait]
impl PlaybackDevice for RodioPlaybackDevice {
    async fn load(&self, source: &AudioSource) -> Result<(), PlaybackError> {
        // Readiness gate: this resolves only after the bytes are fetched
        // and the audio thread has decoded them into a paused sink.
        let bytes = self.fetch(source).await?;
        self.send(|reply| AudioCommand::Load { bytes, reply }).await
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        self.send(|reply| AudioCommand::Play { reply }).await
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        self.send(|reply| AudioCommand::Pause { reply }).await
    }
}

impl Drop for RodioPlaybackDevice {
    fn drop(&mut self) {
        // Best-effort shutdown — the thread may already be dead.
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// The body of the dedicated audio thread. Owns the `OutputStream` and the
/// current sink for their entire lifetime — they never cross threads.
fn run(
    cmd_rx: &mpsc::Receiver<AudioCommand>,
    init_tx: &mpsc::Sender<Result<(), PlaybackError>>,
    events: &UnboundedSender<DeviceEvent>,
) {
    let (stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = init_tx.send(Err(PlaybackError::Device(e.to_string())));
            return;
        }
    };
    // Must stay alive for the duration of the thread.
    let _stream = stream;

    if init_tx.send(Ok(())).is_err() {
        return;
    }

    let mut sink: Option<Arc<Sink>> = None;
    let mut current_bytes: Option<Vec<u8>> = None;
    // Bumped on every load; end-of-stream events from superseded sinks are
    // discarded by comparing generations.
    let generation = Arc::new(AtomicU64::new(0));
    let watching = Arc::new(AtomicBool::new(false));

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            AudioCommand::Load { bytes, reply } => {
                if let Some(old) = sink.take() {
                    old.stop();
                }
                generation.fetch_add(1, Ordering::SeqCst);
                watching.store(false, Ordering::SeqCst);

                let result = prepare_sink(&handle, &bytes);
                match result {
                    Ok(new_sink) => {
                        sink = Some(Arc::new(new_sink));
                        current_bytes = Some(bytes);
                        let _ = reply.send(Ok(()));
                    }
                    Err(e) => {
                        current_bytes = None;
                        let _ = reply.send(Err(e));
                    }
                }
            }

            AudioCommand::Play { reply } => {
                let resumable = sink.as_ref().is_some_and(|s| !s.empty());
                let result = if resumable {
                    match sink.as_ref() {
                        Some(active) => {
                            active.play();
                            Ok(Arc::clone(active))
                        }
                        None => Err(PlaybackError::Device("no source loaded".to_string())),
                    }
                } else if let Some(bytes) = current_bytes.as_deref() {
                    // Drained (replay after end-of-stream): rebuild the sink
                    // from the retained bytes.
                    match prepare_sink(&handle, bytes) {
                        Ok(new_sink) => {
                            let new_sink = Arc::new(new_sink);
                            new_sink.play();
                            generation.fetch_add(1, Ordering::SeqCst);
                            watching.store(false, Ordering::SeqCst);
                            sink = Some(Arc::clone(&new_sink));
                            Ok(new_sink)
                        }
                        Err(e) => Err(e),
                    }
                } else {
                    Err(PlaybackError::Device("no source loaded".to_string()))
                };

                match result {
                    Ok(active) => {
                        spawn_completion_watcher(&active, &generation, &watching, events);
                        let _ = reply.send(Ok(()));
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e));
                    }
                }
            }

            AudioCommand::Pause { reply } => {
                if let Some(active) = &sink {
                    active.pause();
                }
                let _ = reply.send(Ok(()));
            }

            AudioCommand::Shutdown => break,
        }
    }

    tracing::debug!("audio thread shutting down");
}

/// Decode `bytes` into a fresh paused sink. Decoding up front is the
/// readiness check: a corrupt source fails here, not mid-playback.
fn prepare_sink(handle: &rodio::OutputStreamHandle, bytes: &[u8]) -> Result<Sink, PlaybackError> {
    let decoded = Decoder::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| PlaybackError::Load(e.to_string()))?;
    let sink = Sink::try_new(handle).map_err(|e| PlaybackError::Device(e.to_string()))?;
    sink.pause();
    sink.append(decoded);
    Ok(sink)
}

/// Spawn a thread that blocks until the sink drains, then reports
/// end-of-stream — unless the sink was superseded by a newer load.
fn spawn_completion_watcher(
    sink: &Arc<Sink>,
    generation: &Arc<AtomicU64>,
    watching: &Arc<AtomicBool>,
    events: &UnboundedSender<DeviceEvent>,
) {
    if watching.swap(true, Ordering::SeqCst) {
        return; // a watcher for this sink is already running
    }

    let sink = Arc::clone(sink);
    let generation = Arc::clone(generation);
    let gen_at_spawn = generation.load(Ordering::SeqCst);
    let watching = Arc::clone(watching);
    let events = events.clone();

    thread::spawn(move || {
        sink.sleep_until_end();
        if generation.load(Ordering::SeqCst) == gen_at_spawn {
            watching.store(false, Ordering::SeqCst);
            let _ = events.send(DeviceEvent::Ended);
        }
    });
}

/// Fallback device when no audio output is available. Every playback
/// command fails with a descriptive error; everything else keeps working.
pub struct NullPlaybackDevice;

#[async_trait]
impl PlaybackDevice for NullPlaybackDevice {
    async fn load(&self, _source: &AudioSource) -> Result<(), PlaybackError> {
        Err(PlaybackError::Device(
            "no audio output device available".to_string(),
        ))
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        Err(PlaybackError::Device(
            "no audio output device available".to_string(),
        ))
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        // Pausing nothing is a no-op, not an error.
        Ok(())
    }
}

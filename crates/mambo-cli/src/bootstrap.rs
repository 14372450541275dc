//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter. All concrete implementations are instantiated here:
//! - File-backed key-value store (via mambo-store)
//! - HTTP synthesis client and exporter (via mambo-api)
//! - Rodio playback device (local)
//! - Session controller (via mambo-core)
//!
//! Command handlers receive the fully-composed context and delegate to it.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use mambo_api::{ApiConfig, HttpAudioExporter, HttpBackend, MamboClient, ReqwestBackend};
use mambo_core::ports::{DeviceEvent, LinkOpener, PlaybackDevice};
use mambo_core::services::{SessionController, SessionDeps};
use mambo_store::FileKeyValueStore;

use crate::error::CliError;
use crate::opener::ProcessLinkOpener;
use crate::playback::{NullPlaybackDevice, RodioPlaybackDevice};

/// Directory name under the platform data dir.
const DATA_DIR_NAME: &str = "mambo-tts";

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub controller: Arc<SessionController>,
    /// Device-originated playback notifications, forwarded to the
    /// controller by the `play` command loop.
    pub device_events: UnboundedReceiver<DeviceEvent>,
    pub opener: Arc<dyn LinkOpener>,
}

/// Resolve the data directory: an explicit override, or the platform
/// data dir.
fn resolve_data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|base| base.join(DATA_DIR_NAME))
        .ok_or_else(|| CliError::Io("could not determine a data directory".to_string()))
}

/// Wire everything together and hydrate durable state.
pub async fn build_context(data_dir: Option<PathBuf>) -> Result<CliContext, CliError> {
    let dir = resolve_data_dir(data_dir)?;
    let store = Arc::new(
        FileKeyValueStore::open(&dir)
            .await
            .map_err(|e| CliError::Storage(e.to_string()))?,
    );
    tracing::debug!(dir = %dir.display(), "opened data directory");

    let config = ApiConfig::default();
    let synthesizer = Arc::new(MamboClient::new(config.clone()));
    let exporter = Arc::new(HttpAudioExporter::new(&config));

    // Playback is optional: on a headless box the rest of the CLI still works.
    let backend = Arc::new(ReqwestBackend::new(&config)) as Arc<dyn HttpBackend>;
    let (device, device_events): (Arc<dyn PlaybackDevice>, _) =
        match RodioPlaybackDevice::spawn(backend) {
            Ok((device, events)) => (Arc::new(device), events),
            Err(err) => {
                tracing::warn!(%err, "audio output unavailable, playback disabled");
                let (_tx, rx) = unbounded_channel();
                (Arc::new(NullPlaybackDevice), rx)
            }
        };

    let controller = SessionController::new(SessionDeps {
        synthesizer,
        exporter,
        device,
        store,
    });
    controller.load().await;

    Ok(CliContext {
        controller: Arc::new(controller),
        device_events,
        opener: Arc::new(ProcessLinkOpener),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_data_dir_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/custom"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/custom"));
    }
}

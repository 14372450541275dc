//! External link opener using the platform's default handler.

use std::process::Command;

use mambo_core::ports::LinkOpener;

/// Opens URLs via `open` (macOS), `xdg-open` (Linux), or `cmd /C start`
/// (Windows). Fire-and-forget: failures are logged and dropped.
pub struct ProcessLinkOpener;

impl LinkOpener for ProcessLinkOpener {
    fn open(&self, url: &str) {
        #[cfg(target_os = "macos")]
        let spawned = Command::new("open").arg(url).spawn();

        #[cfg(target_os = "linux")]
        let spawned = Command::new("xdg-open").arg(url).spawn();

        #[cfg(target_os = "windows")]
        let spawned = Command::new("cmd").args(["/C", "start", "", url]).spawn();

        if let Err(err) = spawned {
            tracing::warn!(%err, url, "failed to open external link");
        }
    }
}

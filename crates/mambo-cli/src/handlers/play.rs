//! `play` command handler: blocking playback of one history record.

use mambo_core::domain::{RecordId, StatusLine};
use mambo_core::ports::DeviceEvent;

use crate::bootstrap::CliContext;
use crate::error::CliError;

use super::truncate_text;

/// Start playing `id` and block until the device reports end-of-stream.
///
/// Device notifications (pause/resume from native controls, end-of-stream)
/// are forwarded to the controller so its playback state stays reconciled
/// with what the device is actually doing.
pub async fn execute(ctx: &mut CliContext, id: i64) -> Result<(), CliError> {
    let record_id = RecordId(id);
    let Some(record) = ctx.controller.history_record(record_id).await else {
        return Err(CliError::Arguments(format!(
            "no history record with id {record_id}"
        )));
    };

    ctx.controller.toggle_play(record_id).await;
    if let StatusLine::Failure(message) = ctx.controller.status().await {
        return Err(CliError::Playback(message));
    }

    println!("Playing: {}", truncate_text(&record.text, 60));

    while let Some(event) = ctx.device_events.recv().await {
        match event {
            DeviceEvent::Ended => {
                ctx.controller.on_playback_ended().await;
                break;
            }
            DeviceEvent::Paused => ctx.controller.on_external_pause().await,
            DeviceEvent::Resumed => ctx.controller.on_external_play().await,
        }
    }

    Ok(())
}

//! `download` command handler: save audio bytes to disk.

use std::path::Path;

use mambo_core::domain::RecordId;

use crate::bootstrap::CliContext;
use crate::error::CliError;

use super::report_status;

/// Export a history record's audio (or the current audio when `id` is
/// omitted) to `output`.
pub async fn execute(ctx: &CliContext, id: Option<i64>, output: &Path) -> Result<(), CliError> {
    let record_id = match id {
        Some(raw) => {
            let record_id = RecordId(raw);
            if ctx.controller.history_record(record_id).await.is_none() {
                return Err(CliError::Arguments(format!(
                    "no history record with id {record_id}"
                )));
            }
            Some(record_id)
        }
        None => {
            if ctx.controller.current_audio_source().await.is_none() {
                return Err(CliError::Arguments(
                    "no audio to download; run `mambo say` first or pass a record id".to_string(),
                ));
            }
            None
        }
    };

    ctx.controller.download(record_id, output).await;
    report_status(&ctx.controller.status().await)
}

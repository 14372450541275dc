//! `say` command handler: one synthesis round trip.

use std::path::PathBuf;

use mambo_core::domain::AudioFormat;

use crate::bootstrap::CliContext;
use crate::error::CliError;

use super::report_status;

/// Synthesize `text`, adopting the result as the current audio and
/// recording it in history. Optionally save the audio to `save`.
pub async fn execute(
    ctx: &CliContext,
    text: &str,
    format: Option<AudioFormat>,
    credential: Option<String>,
    save: Option<PathBuf>,
) -> Result<(), CliError> {
    let controller = &ctx.controller;

    if let Some(token) = credential {
        controller.update_credential(&token).await;
    }
    if let Some(format) = format {
        controller.update_format(format).await;
    }
    controller.update_input_text(text).await;

    if !controller.can_generate().await {
        return Err(CliError::Arguments(
            "no credential configured; pass --credential or run `mambo config credential <TOKEN>`"
                .to_string(),
        ));
    }

    controller.generate().await;
    report_status(&controller.status().await)?;

    if let Some(destination) = save {
        controller.download(None, &destination).await;
        report_status(&controller.status().await)?;
    }

    Ok(())
}

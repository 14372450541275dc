//! `config` command handlers.

use crate::bootstrap::CliContext;
use crate::commands::ConfigCommand;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<(), CliError> {
    match command {
        ConfigCommand::Credential { token } => {
            ctx.controller.update_credential(&token).await;
            println!("Credential stored.");
        }
        ConfigCommand::Format { format } => {
            ctx.controller.update_format(format).await;
            println!("Preferred format set to {format}.");
        }
        ConfigCommand::Show => show(ctx).await,
    }
    Ok(())
}

async fn show(ctx: &CliContext) {
    let state = ctx.controller.session_state().await;
    println!("credential: {}", mask_credential(&state.credential));
    println!("format:     {}", state.preferred_format);
}

/// Show enough of the credential to recognize it, never the whole thing.
fn mask_credential(credential: &str) -> String {
    let trimmed = credential.trim();
    if trimmed.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = trimmed.chars().take(4).collect();
    format!("{visible}{}", "*".repeat(trimmed.chars().count().saturating_sub(4)))
}

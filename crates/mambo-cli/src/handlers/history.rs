//! `history` command handlers.

use mambo_core::domain::RecordId;

use crate::bootstrap::CliContext;
use crate::commands::HistoryCommand;
use crate::error::CliError;

use super::truncate_text;

pub async fn execute(ctx: &CliContext, command: HistoryCommand) -> Result<(), CliError> {
    match command {
        HistoryCommand::List => list(ctx).await,
        HistoryCommand::Delete { id } => delete(ctx, RecordId(id)).await,
        HistoryCommand::Clear => clear(ctx).await,
    }
}

/// Print all records, newest first.
async fn list(ctx: &CliContext) -> Result<(), CliError> {
    let records = ctx.controller.history_records().await;
    if records.is_empty() {
        println!("No synthesis history.");
        println!("Use 'mambo say <TEXT>' to create your first record.");
        return Ok(());
    }

    println!("{:<15} {:<20} Text", "ID", "Created");
    for record in records {
        println!(
            "{:<15} {:<20} {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            truncate_text(&record.text, 60)
        );
    }
    Ok(())
}

async fn delete(ctx: &CliContext, id: RecordId) -> Result<(), CliError> {
    if ctx.controller.history_record(id).await.is_none() {
        return Err(CliError::Arguments(format!("no history record with id {id}")));
    }
    ctx.controller.delete_history_item(id).await;
    println!("Deleted record {id}.");
    Ok(())
}

async fn clear(ctx: &CliContext) -> Result<(), CliError> {
    let count = ctx.controller.history_records().await.len();
    ctx.controller.clear_history().await;
    println!("Cleared {count} record(s).");
    Ok(())
}

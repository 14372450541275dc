//! `open-site` command handler.

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// The service's public page.
const SITE_URL: &str = "https://www.milorapart.top/";

pub fn execute(ctx: &CliContext) -> Result<(), CliError> {
    ctx.opener.open(SITE_URL);
    println!("Opening {SITE_URL} in your browser...");
    Ok(())
}

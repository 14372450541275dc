//! CLI entry point.
//!
//! Parses arguments, initializes logging, builds the application context
//! via bootstrap, and dispatches to the command handlers. Errors are
//! printed to stderr and mapped to Unix exit codes.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mambo_cli::{Cli, CliError, Commands, build_context, handlers};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut ctx = build_context(cli.data_dir).await?;

    match cli.command {
        Commands::Say {
            text,
            format,
            credential,
            save,
        } => handlers::say::execute(&ctx, &text, format, credential, save).await,
        Commands::History { command } => handlers::history::execute(&ctx, command).await,
        Commands::Download { id, output } => {
            handlers::download::execute(&ctx, id, &output).await
        }
        Commands::Play { id } => handlers::play::execute(&mut ctx, id).await,
        Commands::Config { command } => handlers::config::execute(&ctx, command).await,
        Commands::OpenSite => handlers::site::execute(&ctx),
    }
}

/// Initialize the subscriber: `RUST_LOG` wins, `--verbose` enables debug
/// output for our crates, and the default stays quiet.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,mambo_core=debug,mambo_api=debug,mambo_store=debug,mambo_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

//! Subcommand definitions.

use std::path::PathBuf;

use clap::Subcommand;

use mambo_core::domain::AudioFormat;

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize speech from text
    Say {
        /// The text to synthesize
        text: String,

        /// Audio format (mp3 or wav); defaults to the stored preference
        #[arg(long)]
        format: Option<AudioFormat>,

        /// Access credential; defaults to the stored one
        #[arg(long)]
        credential: Option<String>,

        /// Also save the resulting audio to this path
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Inspect or modify the synthesis history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Save a history record's audio (or the current audio) to disk
    Download {
        /// Record id from `history list`; omit for the most recent audio
        id: Option<i64>,

        /// Destination file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Play a history record through the default audio device
    Play {
        /// Record id from `history list`
        id: i64,
    },

    /// Inspect or modify stored settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Open the service website in the default browser
    OpenSite,
}

/// History subcommands.
#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List all records, newest first
    List,

    /// Delete one record by id
    Delete {
        /// Record id from `history list`
        id: i64,
    },

    /// Delete all records
    Clear,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Store the access credential
    Credential {
        /// Opaque token passed through to the service
        token: String,
    },

    /// Store the preferred audio format
    Format {
        /// mp3 or wav
        format: AudioFormat,
    },

    /// Show stored settings (credential masked)
    Show,
}

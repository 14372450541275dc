//! Command-line client for the Mambo text-to-speech service.
//!
//! The binary in `main.rs` parses arguments and dispatches to the handler
//! modules; `bootstrap` is the composition root that wires the store, API
//! client, and playback device into a session controller.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod opener;
pub mod parser;
pub mod playback;

pub use bootstrap::{CliContext, build_context};
pub use commands::{Commands, ConfigCommand, HistoryCommand};
pub use error::CliError;
pub use parser::Cli;

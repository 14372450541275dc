//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from `CoreError` to exit codes and user-facing messages.

use mambo_core::ports::CoreError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing or lookup error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The remote service (synthesis or download) reported a failure.
    #[error("{0}")]
    Service(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Durable storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Audio device error.
    #[error("Playback error: {0}")]
    Playback(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Service(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Playback(_) => 71, // EX_OSERR
            Self::Storage(_) => 73,  // EX_CANTCREAT (closest fit)
            Self::Io(_) => 74,       // EX_IOERR
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Store(e) => Self::Storage(e.to_string()),
            CoreError::Synthesis(e) => Self::Service(e.to_string()),
            CoreError::Export(e) => Self::Service(e.to_string()),
            CoreError::Playback(e) => Self::Playback(e.to_string()),
            CoreError::Validation(msg) => Self::Arguments(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_sysexits() {
        assert_eq!(CliError::Service("x".into()).exit_code(), 1);
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::Playback("x".into()).exit_code(), 71);
        assert_eq!(CliError::Storage("x".into()).exit_code(), 73);
        assert_eq!(CliError::Io("x".into()).exit_code(), 74);
    }
}

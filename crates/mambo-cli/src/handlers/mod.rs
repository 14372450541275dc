//! Command handlers.
//!
//! Each handler delegates to the session controller through `CliContext`
//! and translates the resulting status into output and exit codes.

pub mod config;
pub mod download;
pub mod history;
pub mod play;
pub mod say;
pub mod site;

use mambo_core::domain::StatusLine;

use crate::error::CliError;

/// Turn the controller's status line into a handler result: failures
/// become service errors, success messages are printed.
pub(crate) fn report_status(status: &StatusLine) -> Result<(), CliError> {
    match status {
        StatusLine::Success(message) => {
            println!("{message}");
            Ok(())
        }
        StatusLine::Failure(message) => Err(CliError::Service(message.clone())),
        StatusLine::None => Ok(()),
    }
}

/// Truncate a string for table display, appending `...` when shortened.
pub(crate) fn truncate_text(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_text_short_string_unchanged() {
        assert_eq!(truncate_text("short", 10), "short");
    }

    #[test]
    fn truncate_text_long_string_gets_ellipsis() {
        assert_eq!(truncate_text("a rather long sentence", 10), "a rathe...");
    }

    #[test]
    fn truncate_text_counts_chars_not_bytes() {
        assert_eq!(truncate_text("你好世界", 4), "你好世界");
    }

    #[test]
    fn report_status_maps_failure_to_service_error() {
        let err = report_status(&StatusLine::Failure("boom".into())).unwrap_err();
        assert!(matches!(err, CliError::Service(m) if m == "boom"));
    }
}

//! Transient session state owned by the session controller.

use serde::{Deserialize, Serialize};

use super::format::AudioFormat;

/// Outcome of the most recent user-visible operation.
///
/// This is the only failure surface adapters observe: synthesis and export
/// failures become a `Failure` message here, never an error crossing the
/// controller boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum StatusLine {
    #[default]
    None,
    Success(String),
    Failure(String),
}

impl StatusLine {
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Draft input, credential, and generation state for one session.
///
/// Not persisted. The playback subset (current source, playing record) is
/// owned by the playback arbiter, not duplicated here.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Current draft text.
    pub input_text: String,
    /// Opaque secret passed through to the synthesis service.
    pub credential: String,
    /// Preferred audio container format.
    pub preferred_format: AudioFormat,
    /// True for the entire lifetime of exactly one in-flight request.
    pub is_generating: bool,
    /// Outcome of the last generate/export action.
    pub last_status: StatusLine,
}

impl SessionState {
    /// True iff a generate action may be dispatched right now: trimmed text
    /// and trimmed credential are both non-empty and no request is in flight.
    pub fn can_generate(&self) -> bool {
        !self.input_text.trim().is_empty()
            && !self.credential.trim().is_empty()
            && !self.is_generating
    }
}

/// Durable single-value settings recalled across restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredPreferences {
    /// Stored credential, if one was ever saved.
    pub credential: Option<String>,
    /// Stored preferred format; defaults to mp3.
    pub format: AudioFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_generate_requires_text_credential_and_idle() {
        let mut state = SessionState {
            input_text: "hello".to_string(),
            credential: "tok_abc".to_string(),
            ..Default::default()
        };
        assert!(state.can_generate());

        state.input_text = "   ".to_string();
        assert!(!state.can_generate());

        state.input_text = "hello".to_string();
        state.credential = "\t\n".to_string();
        assert!(!state.can_generate());

        state.credential = "tok_abc".to_string();
        state.is_generating = true;
        assert!(!state.can_generate());
    }

    #[test]
    fn status_line_predicates() {
        assert!(StatusLine::Failure("boom".into()).is_failure());
        assert!(StatusLine::Success("ok".into()).is_success());
        assert!(!StatusLine::None.is_failure());
        assert!(!StatusLine::None.is_success());
    }
}

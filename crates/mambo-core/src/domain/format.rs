//! Audio output format selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Audio container format offered by the synthesis service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
}

impl AudioFormat {
    /// Wire value sent to the synthesis service.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }

    /// Parse a stored or user-supplied value, falling back to mp3 for
    /// anything unrecognized (the service only accepts these two).
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp3" => Ok(Self::Mp3),
            "wav" => Ok(Self::Wav),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// Error for a format string that is neither `mp3` nor `wav`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown audio format: {0} (expected mp3 or wav)")]
pub struct UnknownFormat(pub String);

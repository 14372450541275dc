//! Synthesis record types and id minting.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier for a synthesis record.
///
/// Ids are minted in strictly increasing order within a session, so sorting
/// by id is sorting by creation order. The inner value is a millisecond
/// timestamp bumped past the previous id on collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque locator for synthesized audio (a URL or a local file path).
///
/// The core never interprets the contents beyond equality and display;
/// adapters decide how to resolve it for playback or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioSource(pub String);

impl AudioSource {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for AudioSource {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One completed text-to-speech result.
///
/// Created only after a *successful* synthesis. `text` and `audio_source`
/// are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRecord {
    /// Unique id, minted at creation time.
    pub id: RecordId,
    /// The exact input text that produced this audio.
    pub text: String,
    /// Locator sufficient to reload the audio for playback or export.
    pub audio_source: AudioSource,
    /// Timestamp of the successful synthesis.
    pub created_at: DateTime<Utc>,
}

/// Mints [`RecordId`]s that are unique and strictly increasing within a
/// session, even when two records are created in the same millisecond.
#[derive(Debug)]
pub struct IdMinter {
    last: AtomicI64,
}

impl IdMinter {
    pub fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Mint the next id: the current wall clock in milliseconds, bumped
    /// past the previously minted id when the clock has not advanced.
    pub fn mint(&self) -> RecordId {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(last.max(now - 1) + 1)
            })
            // The closure never returns None, but fall back to the raw
            // clock rather than panic if that ever changes.
            .unwrap_or(now - 1);
        RecordId(prev.max(now - 1) + 1)
    }
}

impl Default for IdMinter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_ids_are_strictly_increasing() {
        let minter = IdMinter::new();
        let mut prev = minter.mint();
        for _ in 0..1000 {
            let next = minter.mint();
            assert!(next > prev, "{next} should be greater than {prev}");
            prev = next;
        }
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = SynthesisRecord {
            id: RecordId(1_700_000_000_123),
            text: "你好世界".to_string(),
            audio_source: AudioSource::from("https://cdn.example.com/audio/abc.mp3"),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let restored: SynthesisRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
        assert_eq!(restored.created_at, record.created_at);
    }

    #[test]
    fn record_id_serializes_transparently() {
        let json = serde_json::to_string(&RecordId(42)).unwrap();
        assert_eq!(json, "42");
    }
}

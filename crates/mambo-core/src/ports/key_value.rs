//! Durable key-value persistence port.
//!
//! Backs the bounded history collection, the credential, and the preferred
//! format. Must tolerate being empty on first run: a missing key is
//! `Ok(None)`, never an error.

use async_trait::async_trait;
use thiserror::Error;

/// Key under which the full history collection is persisted.
pub const KEY_HISTORY: &str = "history";
/// Key under which the credential is persisted.
pub const KEY_CREDENTIAL: &str = "credential";
/// Key under which the preferred audio format is persisted.
pub const KEY_FORMAT: &str = "format";

/// Errors from the durable store.
///
/// These are deliberately named rather than swallowed invisibly: callers
/// log-and-continue (persistence is a convenience, not a correctness
/// requirement), but tests can assert the failure was reached.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Storage backend error (filesystem, database, etc.).
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Port for durable single-value persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the stored value for `key`, or `None` when never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value in whole.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

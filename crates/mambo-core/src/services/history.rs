//! Bounded, durable synthesis history.
//!
//! Newest-first sequence of [`SynthesisRecord`]s, capped at
//! [`HISTORY_CAP`] entries. Every mutation re-persists the full ordered
//! collection through the [`KeyValueStore`] port; loading tolerates missing
//! or corrupt persisted data (corrupt history must never block startup).

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{RecordId, SynthesisRecord};
use crate::ports::{KEY_HISTORY, KeyValueStore, StoreError};

/// Maximum number of records kept; older entries are silently dropped.
pub const HISTORY_CAP: usize = 30;

/// Service owning the in-memory history and its persistence.
pub struct HistoryService {
    store: Arc<dyn KeyValueStore>,
    records: Mutex<Vec<SynthesisRecord>>,
}

impl HistoryService {
    /// Create an empty history backed by `store`. Call [`load`](Self::load)
    /// once at startup to hydrate it.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Hydrate from durable storage.
    ///
    /// Missing or malformed persisted data yields an empty store with a
    /// warning log — never an error to the caller.
    pub async fn load(&self) {
        let loaded = match self.store.get(KEY_HISTORY).await {
            Ok(Some(json)) => match serde_json::from_str::<Vec<SynthesisRecord>>(&json) {
                Ok(records) => records,
                Err(err) => {
                    tracing::warn!(%err, "persisted history is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(%err, "could not read persisted history, starting empty");
                Vec::new()
            }
        };

        let mut records = self.records.lock().await;
        *records = loaded;
        records.truncate(HISTORY_CAP);
    }

    /// Insert `record` at the front, dropping from the tail past the cap,
    /// then re-persist the whole collection.
    ///
    /// A persistence failure leaves the in-memory state updated; the error
    /// is returned so tests can assert it, and callers log-and-continue.
    pub async fn prepend(&self, record: SynthesisRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        records.insert(0, record);
        records.truncate(HISTORY_CAP);
        self.persist(&records).await
    }

    /// Remove the record with `id` if present. Returns whether a record was
    /// removed; a missing id is a no-op, not an error.
    pub async fn remove_by_id(&self, id: RecordId) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.persist(&records).await?;
        Ok(true)
    }

    /// Empty the history and re-persist the empty collection.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        records.clear();
        self.persist(&records).await
    }

    /// Snapshot of all records, newest first.
    pub async fn records(&self) -> Vec<SynthesisRecord> {
        self.records.lock().await.clone()
    }

    /// Look up one record by id.
    pub async fn get(&self, id: RecordId) -> Option<SynthesisRecord> {
        self.records.lock().await.iter().find(|r| r.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    async fn persist(&self, records: &[SynthesisRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(KEY_HISTORY, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AudioSource, RecordId};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    struct MemoryStore {
        values: StdMutex<HashMap<String, String>>,
        fail_writes: bool,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                values: StdMutex::new(HashMap::new()),
                fail_writes: false,
            }
        }

        fn failing() -> Self {
            Self {
                values: StdMutex::new(HashMap::new()),
                fail_writes: true,
            }
        }

        fn with_value(key: &str, value: &str) -> Self {
            let store = Self::new();
            store
                .values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            store
        }
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Storage("disk full".to_string()));
            }
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn record(id: i64, text: &str) -> SynthesisRecord {
        SynthesisRecord {
            id: RecordId(id),
            text: text.to_string(),
            audio_source: AudioSource(format!("https://cdn.example.com/{id}.mp3")),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn prepend_keeps_newest_first_and_caps_at_thirty() {
        let history = HistoryService::new(Arc::new(MemoryStore::new()));

        for i in 0..40 {
            history.prepend(record(i, &format!("text {i}"))).await.unwrap();
        }

        let records = history.records().await;
        assert_eq!(records.len(), HISTORY_CAP);
        // The 30 most recently prepended, newest first: ids 39 down to 10.
        assert_eq!(records[0].id, RecordId(39));
        assert_eq!(records[HISTORY_CAP - 1].id, RecordId(10));
    }

    #[tokio::test]
    async fn remove_missing_id_is_a_no_op() {
        let history = HistoryService::new(Arc::new(MemoryStore::new()));
        history.prepend(record(1, "one")).await.unwrap();
        history.prepend(record(2, "two")).await.unwrap();

        let removed = history.remove_by_id(RecordId(999)).await.unwrap();
        assert!(!removed);

        let records = history.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, RecordId(2));
        assert_eq!(records[1].id, RecordId(1));
    }

    #[tokio::test]
    async fn remove_existing_id_drops_the_record() {
        let history = HistoryService::new(Arc::new(MemoryStore::new()));
        history.prepend(record(1, "one")).await.unwrap();
        history.prepend(record(2, "two")).await.unwrap();

        assert!(history.remove_by_id(RecordId(1)).await.unwrap());
        assert_eq!(history.len().await, 1);
        assert!(history.get(RecordId(1)).await.is_none());
    }

    #[tokio::test]
    async fn persisted_history_round_trips() {
        let store = Arc::new(MemoryStore::new());
        let history = HistoryService::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
        history.prepend(record(1, "你好世界")).await.unwrap();
        history.prepend(record(2, "second")).await.unwrap();
        let original = history.records().await;

        // A fresh service over the same store sees the same collection.
        let reloaded = HistoryService::new(store);
        reloaded.load().await;
        assert_eq!(reloaded.records().await, original);
    }

    #[tokio::test]
    async fn corrupt_persisted_history_loads_empty() {
        let store = Arc::new(MemoryStore::with_value(KEY_HISTORY, "not json {"));
        let history = HistoryService::new(store);
        history.load().await;
        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn clear_empties_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let history = HistoryService::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
        history.prepend(record(1, "one")).await.unwrap();
        history.clear().await.unwrap();
        assert!(history.is_empty().await);

        let persisted = store.get(KEY_HISTORY).await.unwrap().unwrap();
        assert_eq!(persisted, "[]");
    }

    #[tokio::test]
    async fn persistence_failure_is_reported_but_state_updates() {
        let history = HistoryService::new(Arc::new(MemoryStore::failing()));
        let result = history.prepend(record(1, "one")).await;
        assert!(matches!(result, Err(StoreError::Storage(_))));
        // In-memory state still advanced; persistence is a convenience.
        assert_eq!(history.len().await, 1);
    }
}

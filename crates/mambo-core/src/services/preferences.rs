//! Durable single-value settings: credential and preferred format.

use std::sync::Arc;

use crate::domain::{AudioFormat, StoredPreferences};
use crate::ports::{KEY_CREDENTIAL, KEY_FORMAT, KeyValueStore, StoreError};

/// Service for the credential/preference store.
///
/// Values are written individually and in whole; a missing key on first run
/// yields the default.
pub struct PreferenceService {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load stored preferences. Read failures degrade to defaults with a
    /// warning — settings are a convenience, not a correctness requirement.
    pub async fn load(&self) -> StoredPreferences {
        let credential = match self.store.get(KEY_CREDENTIAL).await {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                tracing::warn!(%err, "could not read stored credential");
                None
            }
        };

        let format = match self.store.get(KEY_FORMAT).await {
            Ok(Some(value)) => AudioFormat::parse_or_default(&value),
            Ok(None) => AudioFormat::default(),
            Err(err) => {
                tracing::warn!(%err, "could not read stored format");
                AudioFormat::default()
            }
        };

        StoredPreferences { credential, format }
    }

    pub async fn save_credential(&self, credential: &str) -> Result<(), StoreError> {
        self.store.set(KEY_CREDENTIAL, credential).await
    }

    pub async fn save_format(&self, format: AudioFormat) -> Result<(), StoreError> {
        self.store.set(KEY_FORMAT, format.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        values: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn first_run_yields_defaults() {
        let prefs = PreferenceService::new(Arc::new(MemoryStore::default()));
        let loaded = prefs.load().await;
        assert_eq!(loaded, StoredPreferences::default());
        assert_eq!(loaded.format, AudioFormat::Mp3);
    }

    #[tokio::test]
    async fn saved_values_are_recalled() {
        let store = Arc::new(MemoryStore::default());
        let prefs = PreferenceService::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);

        prefs.save_credential("tok_abc123").await.unwrap();
        prefs.save_format(AudioFormat::Wav).await.unwrap();

        let loaded = PreferenceService::new(store).load().await;
        assert_eq!(loaded.credential.as_deref(), Some("tok_abc123"));
        assert_eq!(loaded.format, AudioFormat::Wav);
    }

    #[tokio::test]
    async fn unknown_stored_format_falls_back_to_mp3() {
        let store = Arc::new(MemoryStore::default());
        store.set(KEY_FORMAT, "flac").await.unwrap();

        let prefs = PreferenceService::new(store);
        assert_eq!(prefs.load().await.format, AudioFormat::Mp3);
    }
}

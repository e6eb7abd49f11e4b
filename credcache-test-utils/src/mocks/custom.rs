//! Mock caller-supplied credential store

use async_trait::async_trait;
use credcache_core::{CustomCredentialStore, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Application store that keeps cleared keys with an absent marker
///
/// `remove` does not delete the key; it stores `None` under it, the way
/// some application secret stores clear entries.
#[derive(Clone, Default)]
pub struct MockCustomStore {
    entries: Arc<Mutex<HashMap<String, Option<String>>>>,
}

impl MockCustomStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` has ever been written, including cleared keys
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    /// Raw entry under `key`: `None` if never written, `Some(None)` if cleared
    pub fn entry(&self, key: &str) -> Option<Option<String>> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl CustomCredentialStore for MockCustomStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned().flatten())
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), Some(value.to_string()));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().insert(key.to_string(), None);
        Ok(())
    }
}

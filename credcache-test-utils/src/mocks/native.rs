//! Mock implementation of a native secure store for testing

use async_trait::async_trait;
use credcache_core::error::BackendError;
use credcache_core::{NativeStore, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the OS keychain
///
/// Entries are kept in a shared map; clones see the same entries. Failures
/// can be injected to exercise error paths without a real keychain.
///
/// # Examples
///
/// ```rust,no_run
/// use credcache_test_utils::MockNativeStore;
/// use credcache_core::NativeStore;
///
/// # async fn example() -> credcache_core::Result<()> {
/// let store = MockNativeStore::new();
/// store.set("{H}:{U}:{D}:{T}", "token").await?;
/// assert_eq!(store.entry("{H}:{U}:{D}:{T}"), Some("token".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MockNativeStore {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    entries: HashMap<String, String>,
    failure: Option<String>,
    calls: usize,
}

impl MockNativeStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `message`
    pub fn fail_with(&self, message: &str) {
        self.lock().failure = Some(message.to_string());
    }

    /// Stop injecting failures
    pub fn recover(&self) {
        self.lock().failure = None;
    }

    /// Value stored under `key`, bypassing failure injection
    pub fn entry(&self, key: &str) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of get/set/delete calls made so far
    pub fn call_count(&self) -> usize {
        self.lock().calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn begin(&self, operation: &str) -> Result<std::sync::MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls += 1;
        if let Some(message) = &state.failure {
            return Err(BackendError::operation("mock", operation, message.clone()).into());
        }
        Ok(state)
    }
}

#[async_trait]
impl NativeStore for MockNativeStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.begin("read")?.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.begin("write")?
            .entries
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.begin("remove")?.entries.remove(key);
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

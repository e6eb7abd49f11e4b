//! Caller-supplied credential stores
//!
//! Applications with their own secret store implement
//! [`CustomCredentialStore`] and wrap it in a [`CustomCredentialManager`],
//! which addresses entries with the same composite keys the OS keychain
//! backend uses.

use crate::backend::{CredentialBackend, CredentialTriple};
use crate::error::Result;
use crate::key::KeyBuilder;
use async_trait::async_trait;

/// Key/value secret store supplied by the application
#[async_trait]
pub trait CustomCredentialStore: Send + Sync {
    /// Value stored under `key`, `None` if there is none
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Clear the value under `key`
    ///
    /// Implementations may keep the key with an absent marker instead of
    /// deleting it, as long as a later `read` returns `None`.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Composite-key adapter over a [`CustomCredentialStore`]
pub struct CustomCredentialManager<S> {
    store: S,
    keys: KeyBuilder,
}

impl<S: CustomCredentialStore> CustomCredentialManager<S> {
    /// Wrap a store using the default driver id and key format
    pub fn new(store: S) -> Self {
        Self::with_key_builder(store, KeyBuilder::default())
    }

    pub fn with_key_builder(store: S, keys: KeyBuilder) -> Self {
        Self { store, keys }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Key under which the token for this triple is kept in the store
    pub fn build_key(&self, host: &str, user: &str, cred_type: &str) -> String {
        self.keys.build_key(host, user, cred_type)
    }

    pub async fn read(&self, host: &str, user: &str, cred_type: &str) -> Result<Option<String>> {
        self.store.read(&self.build_key(host, user, cred_type)).await
    }

    pub async fn write(&self, host: &str, user: &str, cred_type: &str, token: &str) -> Result<()> {
        self.store
            .write(&self.build_key(host, user, cred_type), token)
            .await
    }

    pub async fn remove(&self, host: &str, user: &str, cred_type: &str) -> Result<()> {
        self.store.remove(&self.build_key(host, user, cred_type)).await
    }
}

#[async_trait]
impl<S: CustomCredentialStore> CredentialBackend for CustomCredentialManager<S> {
    async fn read(&self, triple: CredentialTriple<'_>) -> Result<Option<String>> {
        CustomCredentialManager::read(self, triple.host, triple.user, triple.cred_type).await
    }

    async fn write(&self, triple: CredentialTriple<'_>, token: &str) -> Result<()> {
        CustomCredentialManager::write(self, triple.host, triple.user, triple.cred_type, token)
            .await
    }

    async fn remove(&self, triple: CredentialTriple<'_>) -> Result<()> {
        CustomCredentialManager::remove(self, triple.host, triple.user, triple.cred_type).await
    }

    fn name(&self) -> &str {
        "custom"
    }
}

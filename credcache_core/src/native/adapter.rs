//! Adapter from credential triples to native store keys

use crate::backend::{CredentialBackend, CredentialTriple};
use crate::error::Result;
use crate::key::KeyBuilder;
use crate::native::NativeStore;
use async_trait::async_trait;
use std::sync::Arc;

/// Credential backend that flattens triples into composite keys
pub struct NativeBackendAdapter {
    store: Arc<dyn NativeStore>,
    keys: KeyBuilder,
}

impl NativeBackendAdapter {
    /// Create an adapter over a native store
    pub fn new(store: Arc<dyn NativeStore>, keys: KeyBuilder) -> Self {
        Self { store, keys }
    }

    pub fn key_builder(&self) -> &KeyBuilder {
        &self.keys
    }

    fn key_for(&self, triple: CredentialTriple<'_>) -> String {
        self.keys
            .build_key(triple.host, triple.user, triple.cred_type)
    }
}

#[async_trait]
impl CredentialBackend for NativeBackendAdapter {
    async fn read(&self, triple: CredentialTriple<'_>) -> Result<Option<String>> {
        self.store.get(&self.key_for(triple)).await
    }

    async fn write(&self, triple: CredentialTriple<'_>, token: &str) -> Result<()> {
        self.store.set(&self.key_for(triple), token).await
    }

    async fn remove(&self, triple: CredentialTriple<'_>) -> Result<()> {
        self.store.delete(&self.key_for(triple)).await
    }

    fn name(&self) -> &str {
        self.store.name()
    }
}

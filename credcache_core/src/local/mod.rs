//! Local file credential backend
//!
//! Tokens live in one JSON document nested by host, user and credential
//! type. Every operation loads the whole document, applies the change and
//! writes the whole document back.
//!
//! The load/modify/save cycle is not locked across processes. Two writers
//! that load the document before either saves will lose one of the updates;
//! the last save wins. Cached tokens are advisory, so this is accepted.

mod document;
mod storage;

pub use document::{CredentialDocument, find_credential, remove_token, renew_token};
pub use storage::{DocumentStorage, JsonFileStorage, MemoryStorage};

use crate::backend::{CredentialBackend, CredentialTriple};
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Credential backend over a nested credential document
pub struct LocalCredentialStore<S = JsonFileStorage> {
    storage: S,
}

impl LocalCredentialStore<JsonFileStorage> {
    /// Create a store backed by the JSON file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonFileStorage::new(path))
    }
}

impl<S: DocumentStorage> LocalCredentialStore<S> {
    /// Create a store over the given document storage
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[async_trait]
impl<S: DocumentStorage> CredentialBackend for LocalCredentialStore<S> {
    async fn read(&self, triple: CredentialTriple<'_>) -> Result<Option<String>> {
        let document = self.storage.load().await?;
        let token = find_credential(&document, triple.host, triple.user, triple.cred_type)
            .map(str::to_string);

        log::debug!(
            "Local credential {} for {}/{}/{}",
            if token.is_some() { "hit" } else { "miss" },
            triple.host,
            triple.user,
            triple.cred_type
        );
        Ok(token)
    }

    async fn write(&self, triple: CredentialTriple<'_>, token: &str) -> Result<()> {
        let document = self.storage.load().await?;
        let document = renew_token(
            document,
            triple.host,
            triple.user,
            triple.cred_type,
            token,
        );
        self.storage.save(&document).await?;

        log::debug!(
            "Stored {} for {}/{} in {}",
            triple.cred_type,
            triple.host,
            triple.user,
            self.storage.location()
        );
        Ok(())
    }

    async fn remove(&self, triple: CredentialTriple<'_>) -> Result<()> {
        let document = self.storage.load().await?;
        if find_credential(&document, triple.host, triple.user, triple.cred_type).is_none() {
            return Ok(());
        }

        let document = remove_token(document, triple.host, triple.user, triple.cred_type);
        self.storage.save(&document).await
    }

    fn name(&self) -> &str {
        "local"
    }
}

//! Backend trait definitions
//!
//! A backend stores tokens addressed by a credential triple. How the triple
//! is laid out physically is up to the backend: native and custom stores
//! flatten it into a composite key, the local file store nests it.

use crate::error::Result;
use async_trait::async_trait;

/// The (host, user, credential type) tuple addressing one cached token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialTriple<'a> {
    pub host: &'a str,
    pub user: &'a str,
    pub cred_type: &'a str,
}

impl<'a> CredentialTriple<'a> {
    pub fn new(host: &'a str, user: &'a str, cred_type: &'a str) -> Self {
        Self {
            host,
            user,
            cred_type,
        }
    }
}

/// Trait for credential backends
#[async_trait]
pub trait CredentialBackend: Send + Sync {
    /// Read the token stored for a triple
    ///
    /// Returns `Ok(None)` if nothing is stored, or an error if the backend
    /// could not be queried.
    async fn read(&self, triple: CredentialTriple<'_>) -> Result<Option<String>>;

    /// Store a token, replacing any previous value for the same triple
    async fn write(&self, triple: CredentialTriple<'_>, token: &str) -> Result<()>;

    /// Remove the token for a triple
    ///
    /// Removing a triple that has no token is not an error.
    async fn remove(&self, triple: CredentialTriple<'_>) -> Result<()>;

    /// Get the name of this backend for logging
    fn name(&self) -> &str;
}

/// A backend that doesn't retain anything
///
/// Used when caching is disabled: every read is a miss and every write is
/// discarded.
pub struct NoOpBackend;

impl NoOpBackend {
    /// Create a new no-op backend
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialBackend for NoOpBackend {
    async fn read(&self, _triple: CredentialTriple<'_>) -> Result<Option<String>> {
        Ok(None)
    }

    async fn write(&self, _triple: CredentialTriple<'_>, _token: &str) -> Result<()> {
        Ok(())
    }

    async fn remove(&self, _triple: CredentialTriple<'_>) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_backend_forgets_writes() {
        let backend = NoOpBackend::new();
        let triple = CredentialTriple::new("host", "user", "ID_TOKEN");

        backend.write(triple, "token").await.unwrap();
        assert_eq!(backend.read(triple).await.unwrap(), None);
        backend.remove(triple).await.unwrap();
        assert_eq!(backend.name(), "disabled");
    }
}

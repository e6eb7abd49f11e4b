//! OS keychain store backed by the `keyring` crate
//!
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: kernel keyutils (entries do not survive a reboot)

use crate::error::{BackendError, Result};
use crate::native::{NativePlatform, NativeStore};
use async_trait::async_trait;

const BACKEND_NAME: &str = "keyring";

/// Account name used for the availability probe
const PROBE_ACCOUNT: &str = "credcache-availability-check";

/// Native store writing entries under a fixed keychain service name
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
    platform: NativePlatform,
}

impl KeyringStore {
    /// Check that the OS keychain can be reached and create a store
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unavailable` if the platform has no supported
    /// secure storage or the keychain cannot be queried (for example in a
    /// container without keyring access).
    pub async fn probe(service: impl Into<String>) -> Result<Self> {
        let platform = NativePlatform::current();
        if !platform.is_supported() {
            return Err(BackendError::unavailable(
                BACKEND_NAME,
                "no native secure storage on this platform",
            )
            .into());
        }

        let service = service.into();
        let probe_service = service.clone();
        tokio::task::spawn_blocking(move || {
            let entry = keyring::Entry::new(&probe_service, PROBE_ACCOUNT)?;
            match entry.get_password() {
                Ok(_) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(|e| BackendError::unavailable(BACKEND_NAME, e.to_string()))?
        .map_err(|e| BackendError::unavailable(BACKEND_NAME, format!("{platform}: {e}")))?;

        log::debug!("OS keychain available ({platform}), service '{service}'");
        Ok(Self { service, platform })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn platform(&self) -> NativePlatform {
        self.platform
    }

    /// Run a blocking keychain call for `key` on the blocking pool
    async fn with_entry<T, F>(&self, key: &str, operation: &'static str, call: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&keyring::Entry) -> keyring::Result<T> + Send + 'static,
    {
        let service = self.service.clone();
        let key = key.to_string();

        tokio::task::spawn_blocking(move || {
            let entry = keyring::Entry::new(&service, &key)?;
            call(&entry)
        })
        .await
        .map_err(|e| BackendError::operation(BACKEND_NAME, operation, e.to_string()))?
        .map_err(|e| BackendError::operation(BACKEND_NAME, operation, e.to_string()).into())
    }
}

#[async_trait]
impl NativeStore for KeyringStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_entry(key, "read", |entry| match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let value = value.to_string();
        self.with_entry(key, "write", move |entry| entry.set_password(&value))
            .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.with_entry(key, "remove", |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        })
        .await
    }

    fn name(&self) -> &str {
        BACKEND_NAME
    }
}

//! Credential manager facade
//!
//! The manager is what drivers talk to. It ignores requests with absent
//! arguments, then hands the credential triple to the one backend chosen
//! when the manager was built.

use crate::backend::{CredentialBackend, CredentialTriple, NoOpBackend};
use crate::config::{BackendKind, CacheConfig};
use crate::error::Result;
use crate::local::LocalCredentialStore;
use crate::native::{KeyringStore, NativeBackendAdapter, NativeStore};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Whether any of the arguments is absent
///
/// Only `None` counts as absent: empty strings, `0` and `false` are present
/// values.
pub fn check_for_null(args: &[Option<&dyn fmt::Debug>]) -> bool {
    args.iter().any(Option::is_none)
}

/// Facade over the selected credential backend
pub struct CredentialManager {
    backend: Arc<dyn CredentialBackend>,
}

impl CredentialManager {
    /// Build a manager, selecting the backend from the configuration
    ///
    /// With `BackendKind::Auto` the OS keychain is probed once; if it is
    /// unavailable the local file store is used instead. The choice is fixed
    /// for the lifetime of the manager.
    pub async fn new(config: &CacheConfig) -> Result<Self> {
        let service = config.service_name.clone();
        Self::with_native_probe(config, async move {
            let store = KeyringStore::probe(service).await?;
            Ok(Arc::new(store) as Arc<dyn NativeStore>)
        })
        .await
    }

    /// Build a manager, probing the native store with `probe`
    ///
    /// Applies the selection policy of [`CredentialManager::new`]. The probe
    /// is only awaited when the configured backend may use the native store.
    pub async fn with_native_probe<F>(config: &CacheConfig, probe: F) -> Result<Self>
    where
        F: Future<Output = Result<Arc<dyn NativeStore>>>,
    {
        config.validate()?;

        let backend: Arc<dyn CredentialBackend> = match config.backend {
            BackendKind::Disabled => Arc::new(NoOpBackend::new()),
            BackendKind::Local => Arc::new(Self::local_backend(config)?),
            BackendKind::Native => {
                Arc::new(NativeBackendAdapter::new(probe.await?, config.key_builder()))
            }
            BackendKind::Auto => match probe.await {
                Ok(store) => Arc::new(NativeBackendAdapter::new(store, config.key_builder())),
                Err(e) if e.is_unavailable() => {
                    let local = Self::local_backend(config)?;
                    log::warn!(
                        "{e}; caching credentials in {}",
                        local.storage().path().display()
                    );
                    Arc::new(local)
                }
                Err(e) => return Err(e),
            },
        };

        log::debug!("Using '{}' credential backend", backend.name());
        Ok(Self { backend })
    }

    /// Build a manager over an explicit backend
    pub fn with_backend(backend: Arc<dyn CredentialBackend>) -> Self {
        Self { backend }
    }

    /// Process-wide manager built once from the default configuration
    pub async fn shared() -> Result<&'static CredentialManager> {
        static SHARED: OnceCell<CredentialManager> = OnceCell::const_new();
        SHARED
            .get_or_try_init(|| async { Self::new(&CacheConfig::default()).await })
            .await
    }

    fn local_backend(config: &CacheConfig) -> Result<LocalCredentialStore> {
        Ok(LocalCredentialStore::open(config.local_file_path()?))
    }

    /// Name of the backend in use
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Read the cached token for a credential triple
    ///
    /// Returns `Ok(None)` without touching the backend if any argument is
    /// absent.
    pub async fn read<'a>(
        &self,
        host: impl Into<Option<&'a str>>,
        user: impl Into<Option<&'a str>>,
        cred_type: impl Into<Option<&'a str>>,
    ) -> Result<Option<String>> {
        let Some(triple) = present_triple(host.into(), user.into(), cred_type.into()) else {
            return Ok(None);
        };

        self.backend.read(triple).await
    }

    /// Cache a token, replacing any earlier token for the same triple
    ///
    /// Does nothing if any argument is absent.
    pub async fn write<'a>(
        &self,
        host: impl Into<Option<&'a str>>,
        user: impl Into<Option<&'a str>>,
        cred_type: impl Into<Option<&'a str>>,
        token: impl Into<Option<&'a str>>,
    ) -> Result<()> {
        let (Some(triple), Some(token)) = (
            present_triple(host.into(), user.into(), cred_type.into()),
            token.into(),
        ) else {
            return Ok(());
        };

        self.backend.write(triple, token).await
    }

    /// Drop the cached token for a credential triple
    ///
    /// Does nothing if any argument is absent.
    pub async fn remove<'a>(
        &self,
        host: impl Into<Option<&'a str>>,
        user: impl Into<Option<&'a str>>,
        cred_type: impl Into<Option<&'a str>>,
    ) -> Result<()> {
        let Some(triple) = present_triple(host.into(), user.into(), cred_type.into()) else {
            return Ok(());
        };

        self.backend.remove(triple).await
    }
}

fn present_triple<'a>(
    host: Option<&'a str>,
    user: Option<&'a str>,
    cred_type: Option<&'a str>,
) -> Option<CredentialTriple<'a>> {
    match (host, user, cred_type) {
        (Some(host), Some(user), Some(cred_type)) => {
            Some(CredentialTriple::new(host, user, cred_type))
        }
        _ => {
            log::debug!("Skipping credential cache access, incomplete credential triple");
            None
        }
    }
}

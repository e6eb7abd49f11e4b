//! Credential cache configuration

use crate::error::{Result, ValidationError};
use crate::key::{DEFAULT_DRIVER_ID, KeyBuilder, KeyFormat};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the local credential file directory
pub const CACHE_DIR_ENV: &str = "CREDCACHE_DIR";

/// Default file name of the local credential document
pub const DEFAULT_FILE_NAME: &str = "credential_cache.json";

/// Default keychain service name for native entries
pub const DEFAULT_SERVICE_NAME: &str = "credcache";

/// Which backend the credential manager should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// OS keychain when available, local file otherwise
    #[default]
    Auto,
    /// OS keychain only
    Native,
    /// Local JSON file only
    Local,
    /// Don't cache anything
    Disabled,
}

/// Credential cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: BackendKind,
    /// Directory of the local credential file; falls back to
    /// `$CREDCACHE_DIR`, then the platform cache directory
    pub directory: Option<PathBuf>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub file_name: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub service_name: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub driver_id: String,
    pub key_format: KeyFormat,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Auto,
            directory: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            driver_id: DEFAULT_DRIVER_ID.to_string(),
            key_format: KeyFormat::Braced,
        }
    }
}

impl CacheConfig {
    /// Configuration that always uses the local file in `directory`
    pub fn local(directory: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendKind::Local,
            directory: Some(directory.into()),
            ..Self::default()
        }
    }

    /// Check the configuration for values no backend can work with
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("file_name", &self.file_name),
            ("service_name", &self.service_name),
            ("driver_id", &self.driver_id),
        ];
        match names.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((setting, _)) => Err(ValidationError::empty_setting(*setting).into()),
            None => Ok(()),
        }
    }

    /// Key builder matching this configuration
    pub fn key_builder(&self) -> KeyBuilder {
        KeyBuilder::new(self.driver_id.clone()).with_format(self.key_format)
    }

    /// Resolve the directory holding the local credential file
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.directory {
            return Ok(dir.clone());
        }

        // Allow overriding the directory via env (useful for tests/CI)
        if let Ok(dir) = std::env::var(CACHE_DIR_ENV)
            && !dir.is_empty()
        {
            return Ok(PathBuf::from(dir));
        }

        dirs::cache_dir()
            .map(|dir| dir.join("credcache"))
            .ok_or_else(|| ValidationError::no_cache_directory(CACHE_DIR_ENV).into())
    }

    /// Full path of the local credential file
    pub fn local_file_path(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join(&self.file_name))
    }
}

/// Accept numbers and booleans where a name is expected
///
/// Layered sources such as environment variables hand over `123` or `true`
/// as typed values even when the setting is a plain name.
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        String(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::String(value) => value,
        Scalar::Unsigned(value) => value.to_string(),
        Scalar::Signed(value) => value.to_string(),
        Scalar::Float(value) => value.to_string(),
        Scalar::Bool(value) => value.to_string(),
    })
}

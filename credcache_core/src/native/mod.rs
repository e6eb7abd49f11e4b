//! OS-native secure storage
//!
//! The operating system's credential store is reached through the
//! [`NativeStore`] capability: get, set and delete by opaque string key.
//! [`NativeBackendAdapter`] turns credential triples into those keys.

mod adapter;
mod keyring_store;

pub use adapter::NativeBackendAdapter;
pub use keyring_store::KeyringStore;

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Key/value access to an OS secure storage facility
#[async_trait]
pub trait NativeStore: Send + Sync {
    /// Get the value stored under `key`, `None` if there is no entry
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any existing entry
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the entry under `key`; deleting a missing entry succeeds
    async fn delete(&self, key: &str) -> Result<()>;

    /// Get the name of this store for logging
    fn name(&self) -> &str;
}

/// Secure storage technology used on the current platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativePlatform {
    /// macOS Keychain
    MacosKeychain,
    /// Windows Credential Manager
    WindowsCredentialManager,
    /// Linux kernel key retention service
    LinuxKeyutils,
    /// No supported secure storage
    Unsupported,
}

impl NativePlatform {
    /// Detect the technology for the platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacosKeychain
        } else if cfg!(target_os = "windows") {
            Self::WindowsCredentialManager
        } else if cfg!(target_os = "linux") {
            Self::LinuxKeyutils
        } else {
            Self::Unsupported
        }
    }

    pub fn is_supported(&self) -> bool {
        *self != Self::Unsupported
    }
}

impl fmt::Display for NativePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MacosKeychain => "macOS Keychain",
            Self::WindowsCredentialManager => "Windows Credential Manager",
            Self::LinuxKeyutils => "Linux keyutils",
            Self::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

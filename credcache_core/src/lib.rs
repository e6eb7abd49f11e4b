//! Credential cache core library
//!
//! Caches short-lived authentication tokens for database drivers so repeated
//! connections can skip a full re-authentication. Tokens are addressed by
//! (host, user, credential type) and kept in the OS keychain, a local JSON
//! file, or a store supplied by the application.

pub mod backend;
pub mod config;
pub mod credential_type;
pub mod custom;
pub mod error;
pub mod key;
pub mod local;
pub mod manager;
pub mod native;

// Re-export main types
pub use backend::{CredentialBackend, CredentialTriple, NoOpBackend};
pub use config::{BackendKind, CacheConfig};
pub use credential_type::CredentialType;
pub use custom::{CustomCredentialManager, CustomCredentialStore};
pub use error::{Error, Result};
pub use key::{DEFAULT_DRIVER_ID, KeyBuilder, KeyFormat};
pub use local::{CredentialDocument, LocalCredentialStore};
pub use manager::{CredentialManager, check_for_null};
pub use native::{KeyringStore, NativeBackendAdapter, NativePlatform, NativeStore};

//! Where the local credential document lives
//!
//! `DocumentStorage` is the resource handle the local backend loads from and
//! saves to. `JsonFileStorage` keeps the document in a JSON file on disk,
//! `MemoryStorage` keeps it in process.

use crate::error::{BackendError, IoError, Result};
use crate::local::CredentialDocument;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::sync::RwLock;

/// Load/save handle for a credential document
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Load the whole document
    ///
    /// A missing or unparseable document loads as empty.
    async fn load(&self) -> Result<CredentialDocument>;

    /// Replace the stored document
    async fn save(&self, document: &CredentialDocument) -> Result<()>;

    /// Human readable location, for logs
    fn location(&self) -> String;
}

/// Credential document stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage handle for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> IoError {
        IoError::from_std(source).with_path(&self.path)
    }
}

#[async_trait]
impl DocumentStorage for JsonFileStorage {
    async fn load(&self) -> Result<CredentialDocument> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CredentialDocument::new());
            }
            Err(e) => return Err(self.io_error(e).into()),
        };

        if content.trim().is_empty() {
            return Ok(CredentialDocument::new());
        }

        match CredentialDocument::parse(&content) {
            Ok(document) => Ok(document),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable credential file {}: {e}",
                    self.path.display()
                );
                Ok(CredentialDocument::new())
            }
        }
    }

    async fn save(&self, document: &CredentialDocument) -> Result<()> {
        let data = serde_json::to_vec_pretty(document)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || replace_file(&path, &data))
            .await
            .map_err(|e| BackendError::operation("local", "write", e.to_string()))?
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Atomically replace `path` with `data`
///
/// Each save writes its own temp file next to the target, created owner-only,
/// and renames it over the target. Concurrent saves never share a temp file,
/// so the target always holds one complete document.
fn replace_file(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| IoError::from_std(e).with_path(dir))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| IoError::from_std(e).with_path(dir))?;
    temp.write_all(data)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| IoError::from_std(e).with_path(temp.path()))?;

    temp.persist(path)
        .map_err(|e| IoError::from_std(e.error).with_path(path))?;
    Ok(())
}

/// Credential document held in memory
///
/// Nothing survives the process. Useful for tests and for embedding the
/// local backend where no file system is available.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: RwLock<CredentialDocument>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an in-memory storage seeded with a document
    pub fn with_document(document: CredentialDocument) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }

    /// Copy of the current document
    pub async fn snapshot(&self) -> CredentialDocument {
        self.document.read().await.clone()
    }
}

#[async_trait]
impl DocumentStorage for MemoryStorage {
    async fn load(&self) -> Result<CredentialDocument> {
        Ok(self.snapshot().await)
    }

    async fn save(&self, document: &CredentialDocument) -> Result<()> {
        *self.document.write().await = document.clone();
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::{find_credential, renew_token};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp.path().join("absent.json"));

        let document = storage.load().await.unwrap();
        assert!(document.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cache.json");
        fs::write(&path, b"{ this is not json").await.unwrap();

        let document = JsonFileStorage::new(&path).load().await.unwrap();
        assert!(document.is_empty());
    }

    #[tokio::test]
    async fn test_empty_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cache.json");
        fs::write(&path, b"  \n").await.unwrap();

        let document = JsonFileStorage::new(&path).load().await.unwrap();
        assert!(document.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_parent_and_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dir").join("cache.json");
        let storage = JsonFileStorage::new(&path);

        let document = renew_token(CredentialDocument::new(), "h", "u", "t", "tok");
        storage.save(&document).await.unwrap();

        assert!(path.exists());
        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("cache.json")]);
        let loaded = storage.load().await.unwrap();
        assert_eq!(find_credential(&loaded, "h", "u", "t"), Some("tok"));
    }

    #[tokio::test]
    async fn test_saved_file_is_plain_nested_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cache.json");
        let storage = JsonFileStorage::new(&path);

        let document = renew_token(CredentialDocument::new(), "h", "u", "t", "tok");
        storage.save(&document).await.unwrap();

        let raw = fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({ "h": { "u": { "t": "tok" } } }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cache.json");
        JsonFileStorage::new(&path)
            .save(&CredentialDocument::new())
            .await
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_save_ignores_stale_temp_and_loose_target_modes() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("credential_cache.json");
        // Left behind by an interrupted save of an older release
        let stale = path.with_extension("tmp");
        std::fs::write(&stale, b"{}").unwrap();
        std::fs::write(&path, b"{}").unwrap();
        for file in [&stale, &path] {
            std::fs::set_permissions(file, std::fs::Permissions::from_mode(0o644)).unwrap();
        }

        let document = renew_token(CredentialDocument::new(), "h", "u", "t", "tok");
        JsonFileStorage::new(&path).save(&document).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_save_into_directory_that_is_a_file_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let storage = JsonFileStorage::new(blocker.join("cache.json"));
        assert!(storage.save(&CredentialDocument::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_unreadable_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        // A directory where the file should be
        let storage = JsonFileStorage::new(temp.path());

        assert!(storage.load().await.is_err());
    }

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        let document = renew_token(CredentialDocument::new(), "h", "u", "t", "tok");
        storage.save(&document).await.unwrap();

        assert_eq!(storage.snapshot().await, document);
        assert_eq!(storage.location(), "memory");
    }

    #[tokio::test]
    async fn test_memory_storage_seeded_document() {
        let seeded = renew_token(CredentialDocument::new(), "h", "u", "t", "seed");
        let storage = MemoryStorage::with_document(seeded);

        let loaded = storage.load().await.unwrap();
        assert_eq!(find_credential(&loaded, "h", "u", "t"), Some("seed"));
    }
}

//! Credential document builders

use credcache_core::local::{CredentialDocument, renew_token};
use std::path::{Path, PathBuf};

/// Builder for credential documents and credential files
///
/// # Examples
///
/// ```rust
/// use credcache_test_utils::DocumentBuilder;
///
/// let document = DocumentBuilder::new()
///     .with_token("mock_host", "mock_user", "ID_TOKEN", "mock_token")
///     .build();
/// assert_eq!(document.token_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    tokens: Vec<(String, String, String, String)>,
}

impl DocumentBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token for a triple
    pub fn with_token(mut self, host: &str, user: &str, cred_type: &str, token: &str) -> Self {
        self.tokens.push((
            host.to_string(),
            user.to_string(),
            cred_type.to_string(),
            token.to_string(),
        ));
        self
    }

    /// Build the document
    pub fn build(self) -> CredentialDocument {
        self.tokens.iter().fold(
            CredentialDocument::new(),
            |document, (host, user, cred_type, token)| {
                renew_token(document, host, user, cred_type, token)
            },
        )
    }

    /// Render the document as the JSON text of a credential file
    pub fn into_json(self) -> String {
        serde_json::to_string_pretty(&self.build()).unwrap()
    }

    /// Write the document to `dir/file_name` and return the file path
    pub fn write_to(self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        std::fs::write(&path, self.into_json()).unwrap();
        path
    }
}

//! Well-known credential types cached by the driver

use std::fmt;

/// Credential types the driver caches between connections
///
/// The cache itself accepts any string as a credential type; these are the
/// names the driver uses so that tokens written by different clients line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialType {
    /// ID token obtained through browser based SSO
    IdToken,
    /// MFA token obtained through username/password + MFA
    MfaToken,
}

impl CredentialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IdToken => "ID_TOKEN",
            Self::MfaToken => "MFA_TOKEN",
        }
    }
}

impl AsRef<str> for CredentialType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

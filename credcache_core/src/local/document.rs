//! The credential document kept by the local file backend
//!
//! The document nests tokens three levels deep:
//!
//! ```json
//! { "host": { "user": { "ID_TOKEN": "token" } } }
//! ```
//!
//! All operations here are pure: they take a document and hand back the
//! updated one, so they can be exercised without touching the disk.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use zeroize::Zeroize;

type TokensByType = BTreeMap<String, String>;
type TypesByUser = BTreeMap<String, TokensByType>;

/// host → user → credential type → token
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CredentialDocument {
    hosts: BTreeMap<String, TypesByUser>,
}

impl CredentialDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from JSON text
    ///
    /// Fails only if the text is not JSON at all. Branches with the wrong
    /// shape and non-string leaves (such as the `null` left behind by other
    /// clients when they clear a token) are skipped.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(content)?;
        Ok(Self::from_value(value))
    }

    /// Build a document from a JSON value, keeping only well-formed entries
    pub fn from_value(value: Value) -> Self {
        let mut document = Self::new();
        let Value::Object(hosts) = value else {
            log::debug!("Credential document is not a JSON object, ignoring it");
            return document;
        };

        for (host, users) in hosts {
            let Value::Object(users) = users else {
                continue;
            };
            for (user, types) in users {
                let Value::Object(types) = types else {
                    continue;
                };
                for (cred_type, token) in types {
                    if let Value::String(token) = token {
                        document = renew_token(document, &host, &user, &cred_type, &token);
                    }
                }
            }
        }

        document
    }

    /// Whether the document holds no tokens
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Number of tokens in the document
    pub fn token_count(&self) -> usize {
        self.hosts
            .values()
            .flat_map(|users| users.values())
            .map(|types| types.len())
            .sum()
    }

    /// Hosts that have at least one token
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }
}

impl Drop for CredentialDocument {
    fn drop(&mut self) {
        for token in self
            .hosts
            .values_mut()
            .flat_map(|users| users.values_mut())
            .flat_map(|types| types.values_mut())
        {
            token.zeroize();
        }
    }
}

impl fmt::Debug for CredentialDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: BTreeMap<&str, BTreeMap<&str, Vec<&str>>> = self
            .hosts
            .iter()
            .map(|(host, users)| {
                let users: BTreeMap<&str, Vec<&str>> = users
                    .iter()
                    .map(|(user, types)| {
                        let types: Vec<&str> = types.keys().map(String::as_str).collect();
                        (user.as_str(), types)
                    })
                    .collect();
                (host.as_str(), users)
            })
            .collect();

        f.debug_struct("CredentialDocument")
            .field("hosts", &redacted)
            .finish()
    }
}

/// Set `document[host][user][cred_type] = token`
///
/// Missing levels are created; every other path in the document is left as
/// it was.
pub fn renew_token(
    mut document: CredentialDocument,
    host: &str,
    user: &str,
    cred_type: &str,
    token: &str,
) -> CredentialDocument {
    let previous = document
        .hosts
        .entry(host.to_string())
        .or_default()
        .entry(user.to_string())
        .or_default()
        .insert(cred_type.to_string(), token.to_string());

    if let Some(mut previous) = previous {
        previous.zeroize();
    }

    document
}

/// Look up the token at `document[host][user][cred_type]`
///
/// Returns `None` when any argument is absent or any level of the path is
/// missing.
pub fn find_credential<'d, 'a>(
    document: &'d CredentialDocument,
    host: impl Into<Option<&'a str>>,
    user: impl Into<Option<&'a str>>,
    cred_type: impl Into<Option<&'a str>>,
) -> Option<&'d str> {
    let (host, user, cred_type) = (host.into()?, user.into()?, cred_type.into()?);

    document
        .hosts
        .get(host)
        .and_then(|users| users.get(user))
        .and_then(|types| types.get(cred_type))
        .map(String::as_str)
}

/// Delete the token at `document[host][user][cred_type]`
///
/// User and host levels left empty by the removal are pruned. Removing a
/// path that does not exist returns the document unchanged.
pub fn remove_token(
    mut document: CredentialDocument,
    host: &str,
    user: &str,
    cred_type: &str,
) -> CredentialDocument {
    let Some(users) = document.hosts.get_mut(host) else {
        return document;
    };

    if let Some(types) = users.get_mut(user) {
        if let Some(mut token) = types.remove(cred_type) {
            token.zeroize();
        }
        if types.is_empty() {
            users.remove(user);
        }
    }

    if users.is_empty() {
        document.hosts.remove(host);
    }

    document
}

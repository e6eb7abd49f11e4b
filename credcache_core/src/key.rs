//! Composite key construction for flat key/value backends
//!
//! Native and custom backends address a credential by a single string. The
//! key combines host, user, a fixed driver identifier and the credential
//! type, each upper-cased and wrapped in braces:
//!
//! ```text
//! {MOCK_HOST}:{MOCK_USER}:{SF_NODE_JS_DRIVER}:{MOCK_CRED}
//! ```
//!
//! Backslashes and braces inside a component are escaped with a backslash,
//! so a component can never close its own brace early and impersonate a
//! different triple.

use serde::{Deserialize, Serialize};

/// Driver identifier embedded in every composite key
///
/// Kept identical to the one used by the Node.js driver so both share
/// tokens already stored in the OS keychain.
pub const DEFAULT_DRIVER_ID: &str = "SF_NODE_JS_DRIVER";

/// Bracing scheme of the composite key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyFormat {
    /// Every component wrapped in exactly one pair of braces
    #[default]
    Braced,
    /// Same as `Braced` with an extra closing brace at the end, matching
    /// keys written by older driver releases
    Legacy,
}

/// Builds composite keys from credential triples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBuilder {
    driver_id: String,
    format: KeyFormat,
}

impl Default for KeyBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_DRIVER_ID)
    }
}

impl KeyBuilder {
    /// Create a key builder for the given driver identifier
    pub fn new(driver_id: impl Into<String>) -> Self {
        Self {
            driver_id: driver_id.into(),
            format: KeyFormat::default(),
        }
    }

    /// Use a different bracing scheme
    pub fn with_format(mut self, format: KeyFormat) -> Self {
        self.format = format;
        self
    }

    pub fn driver_id(&self) -> &str {
        &self.driver_id
    }

    pub fn format(&self) -> KeyFormat {
        self.format
    }

    /// Build the composite key for a credential triple
    ///
    /// Inputs are expected to be validated by the caller.
    pub fn build_key(&self, host: &str, user: &str, cred_type: &str) -> String {
        let mut key = [host, user, self.driver_id.as_str(), cred_type]
            .into_iter()
            .map(wrap_component)
            .collect::<Vec<_>>()
            .join(":");

        if self.format == KeyFormat::Legacy {
            key.push('}');
        }

        key
    }
}

fn wrap_component(component: &str) -> String {
    let normalized = component.to_uppercase();
    let mut wrapped = String::with_capacity(normalized.len() + 2);
    wrapped.push('{');
    for ch in normalized.chars() {
        if matches!(ch, '\\' | '{' | '}') {
            wrapped.push('\\');
        }
        wrapped.push(ch);
    }
    wrapped.push('}');
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_build_key_golden_value() {
        let builder = KeyBuilder::default();
        assert_eq!(
            builder.build_key("mock_host", "mock_user", "mock_cred"),
            "{MOCK_HOST}:{MOCK_USER}:{SF_NODE_JS_DRIVER}:{MOCK_CRED}"
        );
    }

    #[test]
    fn test_build_key_legacy_format() {
        let builder = KeyBuilder::default().with_format(KeyFormat::Legacy);
        assert_eq!(
            builder.build_key("mock_host", "mock_user", "mock_cred"),
            "{MOCK_HOST}:{MOCK_USER}:{SF_NODE_JS_DRIVER}:{MOCK_CRED}}"
        );
    }

    #[test]
    fn test_build_key_is_case_insensitive() {
        let builder = KeyBuilder::default();
        assert_eq!(
            builder.build_key("Account.Snowflakecomputing.com", "Alice", "id_token"),
            builder.build_key("ACCOUNT.SNOWFLAKECOMPUTING.COM", "alice", "ID_TOKEN")
        );
    }

    #[test]
    fn test_custom_driver_id() {
        let builder = KeyBuilder::new("sf_rust_driver");
        assert_eq!(builder.driver_id(), "sf_rust_driver");
        assert_eq!(
            builder.build_key("h", "u", "t"),
            "{H}:{U}:{SF_RUST_DRIVER}:{T}"
        );
    }

    #[test]
    fn test_delimiters_cannot_forge_another_triple() {
        let builder = KeyBuilder::default();
        let honest = builder.build_key("a", "b", "c");
        let forged = builder.build_key("a}:{b", "c", "c");
        assert_ne!(honest, forged);

        let left = builder.build_key("a}", "b", "c");
        let right = builder.build_key("a", "}b", "c");
        assert_ne!(left, right);

        assert_eq!(
            builder.build_key("a{b}", "u\\", "t"),
            "{A\\{B\\}}:{U\\\\}:{SF_NODE_JS_DRIVER}:{T}"
        );
    }

    #[test]
    fn test_key_format_serde_names() {
        assert_eq!(
            serde_json::to_string(&KeyFormat::Legacy).unwrap(),
            "\"legacy\""
        );
        let parsed: KeyFormat = serde_json::from_str("\"braced\"").unwrap();
        assert_eq!(parsed, KeyFormat::Braced);
    }

    fn component() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_.:{}\\\\]{0,8}"
    }

    proptest! {
        #[test]
        fn prop_keys_collide_only_when_triples_fold_together(
            a in (component(), component(), component()),
            b in (component(), component(), component()),
        ) {
            let builder = KeyBuilder::default();
            let key_a = builder.build_key(&a.0, &a.1, &a.2);
            let key_b = builder.build_key(&b.0, &b.1, &b.2);
            let folded_a = (a.0.to_uppercase(), a.1.to_uppercase(), a.2.to_uppercase());
            let folded_b = (b.0.to_uppercase(), b.1.to_uppercase(), b.2.to_uppercase());

            prop_assert_eq!(key_a == key_b, folded_a == folded_b);
        }

        #[test]
        fn prop_build_key_is_deterministic(t in (component(), component(), component())) {
            let builder = KeyBuilder::default();
            prop_assert_eq!(
                builder.build_key(&t.0, &t.1, &t.2),
                builder.build_key(&t.0, &t.1, &t.2)
            );
        }
    }
}

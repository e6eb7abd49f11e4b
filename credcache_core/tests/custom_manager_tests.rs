//! Tests for the caller-supplied credential store adapter

use credcache_core::*;
use credcache_test_utils::MockCustomStore;
use std::sync::Arc;

const HOST: &str = "mock_host";
const USER: &str = "mock_user";
const CRED_TYPE: &str = "mock_cred";

#[cfg(test)]
mod custom_credential_manager_tests {
    use super::*;

    #[test]
    fn test_build_key() {
        let manager = CustomCredentialManager::new(MockCustomStore::new());

        assert_eq!(
            manager.build_key(HOST, USER, CRED_TYPE),
            "{MOCK_HOST}:{MOCK_USER}:{SF_NODE_JS_DRIVER}:{MOCK_CRED}"
        );
    }

    #[test]
    fn test_build_key_legacy_format() {
        let manager = CustomCredentialManager::with_key_builder(
            MockCustomStore::new(),
            KeyBuilder::default().with_format(KeyFormat::Legacy),
        );

        assert_eq!(
            manager.build_key(HOST, USER, CRED_TYPE),
            "{MOCK_HOST}:{MOCK_USER}:{SF_NODE_JS_DRIVER}:{MOCK_CRED}}"
        );
    }

    #[tokio::test]
    async fn test_read_before_write_is_none() {
        let manager = CustomCredentialManager::new(MockCustomStore::new());
        assert_eq!(manager.read(HOST, USER, CRED_TYPE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let manager = CustomCredentialManager::new(MockCustomStore::new());

        manager
            .write(HOST, USER, CRED_TYPE, "random_token")
            .await
            .unwrap();

        assert_eq!(
            manager.read(HOST, USER, CRED_TYPE).await.unwrap(),
            Some("random_token".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_leaves_absent_marker() {
        let store = MockCustomStore::new();
        let manager = CustomCredentialManager::new(store.clone());
        let key = manager.build_key(HOST, USER, CRED_TYPE);

        manager
            .write(HOST, USER, CRED_TYPE, "random_token")
            .await
            .unwrap();
        manager.remove(HOST, USER, CRED_TYPE).await.unwrap();

        assert_eq!(manager.read(HOST, USER, CRED_TYPE).await.unwrap(), None);
        assert!(store.contains_key(&key));
        assert_eq!(store.entry(&key), Some(None));
    }

    #[tokio::test]
    async fn test_keys_are_case_insensitive() {
        let manager = CustomCredentialManager::new(MockCustomStore::new());

        manager.write("Host", "User", "ID_TOKEN", "token").await.unwrap();

        assert_eq!(
            manager.read("HOST", "user", "id_token").await.unwrap(),
            Some("token".to_string())
        );
    }
}

#[cfg(test)]
mod custom_backend_tests {
    use super::*;

    #[tokio::test]
    async fn test_custom_store_behind_manager_null_guard() {
        let store = MockCustomStore::new();
        let manager =
            CredentialManager::with_backend(Arc::new(CustomCredentialManager::new(store.clone())));

        manager.write(HOST, USER, None::<&str>, "token").await.unwrap();
        manager.write(HOST, USER, CRED_TYPE, "token").await.unwrap();

        assert_eq!(manager.backend_name(), "custom");
        assert!(!store.contains_key("{MOCK_HOST}:{MOCK_USER}:{SF_NODE_JS_DRIVER}:{}"));
        assert_eq!(
            manager.read(HOST, USER, CRED_TYPE).await.unwrap(),
            Some("token".to_string())
        );

        manager.remove(HOST, USER, CRED_TYPE).await.unwrap();
        assert_eq!(manager.read(HOST, USER, CRED_TYPE).await.unwrap(), None);
    }
}

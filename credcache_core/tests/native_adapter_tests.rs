//! Native backend adapter tests against an in-memory keychain

use credcache_core::*;
use credcache_test_utils::MockNativeStore;
use std::sync::Arc;

fn adapter(store: &MockNativeStore) -> NativeBackendAdapter {
    NativeBackendAdapter::new(Arc::new(store.clone()), KeyBuilder::default())
}

#[cfg(test)]
mod native_adapter_tests {
    use super::*;

    #[tokio::test]
    async fn test_write_uses_composite_key() {
        let store = MockNativeStore::new();
        let backend = adapter(&store);

        backend
            .write(CredentialTriple::new("host", "user", "ID_TOKEN"), "token")
            .await
            .unwrap();

        assert_eq!(
            store.keys(),
            vec!["{HOST}:{USER}:{SF_NODE_JS_DRIVER}:{ID_TOKEN}".to_string()]
        );
    }

    #[tokio::test]
    async fn test_read_remove_round_trip() {
        let store = MockNativeStore::new();
        let backend = adapter(&store);
        let triple = CredentialTriple::new("host", "user", "MFA_TOKEN");

        assert_eq!(backend.read(triple).await.unwrap(), None);
        backend.write(triple, "token").await.unwrap();
        assert_eq!(backend.read(triple).await.unwrap(), Some("token".to_string()));

        backend.remove(triple).await.unwrap();
        assert_eq!(backend.read(triple).await.unwrap(), None);
        assert!(store.keys().is_empty());

        // Removing again is not an error
        backend.remove(triple).await.unwrap();
    }

    #[tokio::test]
    async fn test_triples_differing_in_case_share_a_key() {
        let store = MockNativeStore::new();
        let backend = adapter(&store);

        backend
            .write(CredentialTriple::new("Host", "User", "id_token"), "first")
            .await
            .unwrap();
        backend
            .write(CredentialTriple::new("HOST", "user", "ID_TOKEN"), "second")
            .await
            .unwrap();

        assert_eq!(store.keys().len(), 1);
    }

    #[tokio::test]
    async fn test_braces_in_components_do_not_collide() {
        let store = MockNativeStore::new();
        let backend = adapter(&store);

        backend
            .write(CredentialTriple::new("a}:{b", "c", "t"), "forged")
            .await
            .unwrap();
        backend
            .write(CredentialTriple::new("a", "b}:{c", "t"), "other")
            .await
            .unwrap();

        assert_eq!(store.keys().len(), 2);
    }

    #[tokio::test]
    async fn test_store_errors_are_returned() {
        let store = MockNativeStore::new();
        let backend = adapter(&store);
        store.fail_with("denied");

        let error = backend
            .read(CredentialTriple::new("host", "user", "ID_TOKEN"))
            .await
            .unwrap_err();

        assert!(!error.is_unavailable());
        assert!(error.to_string().contains("denied"));
    }

    #[test]
    fn test_adapter_reports_store_name() {
        let backend = adapter(&MockNativeStore::new());
        assert_eq!(backend.name(), "mock");
        assert_eq!(backend.key_builder().driver_id(), DEFAULT_DRIVER_ID);
    }
}

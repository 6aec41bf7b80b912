use taskthread::config::StorageConfig;
use taskthread::storage::LocalStorage;

#[tokio::test]
async fn test_local_storage_creation() {
    // Test that we can create local storage (use in-memory database for tests)
    let result = LocalStorage::in_memory().await;
    assert!(result.is_ok(), "LocalStorage should be created successfully");
}

#[tokio::test]
async fn test_new_storage_is_empty() {
    let storage = LocalStorage::in_memory().await.unwrap();
    assert!(!storage.has_data().await.unwrap());
}

#[tokio::test]
async fn test_memory_url_ignores_pool_size() {
    // Several pooled connections would each see their own empty database
    let config = StorageConfig {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 8,
    };
    let storage = LocalStorage::new(&config).await.unwrap();
    assert!(!storage.has_data().await.unwrap());
}

#[tokio::test]
async fn test_invalid_url_fails() {
    let config = StorageConfig {
        database_url: "notadb://nowhere".to_string(),
        max_connections: 1,
    };
    assert!(LocalStorage::new(&config).await.is_err());
}

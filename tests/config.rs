use taskthread::config::{Config, TaskOrder};

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.storage.database_url, "sqlite::memory:");
    assert_eq!(config.storage.max_connections, 1);
    assert!(!config.logging.enabled);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.listing.task_order, TaskOrder::NewestFirst);
    assert!(config.client.reject_concurrent_same_id);
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    // Empty database URL should fail
    config.storage.database_url = "  ".to_string();
    assert!(config.validate().is_err());

    // Reset and test pool bounds
    config.storage.database_url = "sqlite::memory:".to_string();
    config.storage.max_connections = 0;
    assert!(config.validate().is_err());
    config.storage.max_connections = 65;
    assert!(config.validate().is_err());

    // Reset and test log level
    config.storage.max_connections = 4;
    config.logging.level = "chatty".to_string();
    assert!(config.validate().is_err());
    config.logging.level = "WARN".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("database_url = \"sqlite::memory:\""));
    assert!(toml_str.contains("task_order = \"newest_first\""));
    assert!(toml_str.contains("reject_concurrent_same_id = true"));
}

#[test]
fn test_partial_config_deserialization() {
    // Test that partial TOML configs merge with defaults
    let partial_toml = r#"
[listing]
task_order = "oldest_first"

[logging]
enabled = true
"#;

    let config: Config = toml::from_str(partial_toml).unwrap();

    // Check that specified values are used
    assert_eq!(config.listing.task_order, TaskOrder::OldestFirst);
    assert!(config.logging.enabled);

    // Check that unspecified values use defaults
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.storage.database_url, "sqlite::memory:");
    assert!(config.client.reject_concurrent_same_id);
}

#[test]
fn test_empty_config_deserialization() {
    // Test that empty TOML uses all defaults
    let config: Config = toml::from_str("").unwrap();
    let default_config = Config::default();

    assert_eq!(config.storage.database_url, default_config.storage.database_url);
    assert_eq!(config.logging.enabled, default_config.logging.enabled);
    assert_eq!(config.listing.task_order, default_config.listing.task_order);
}

#[test]
fn test_load_from_file_validates() {
    let dir = std::env::temp_dir().join("taskthread_test_load");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let good = dir.join("good.toml");
    std::fs::write(&good, "[storage]\nmax_connections = 2\n").unwrap();
    assert_eq!(Config::load_from_file(&good).unwrap().storage.max_connections, 2);

    let bad = dir.join("bad.toml");
    std::fs::write(&bad, "[storage]\nmax_connections = 0\n").unwrap();
    assert!(Config::load_from_file(&bad).is_err());

    assert!(Config::load_from_file(dir.join("missing.toml")).is_err());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_generate_config_creates_directory() {
    use std::fs;

    // Create a temporary path that doesn't exist
    let temp_dir = std::env::temp_dir().join("taskthread_test_config");
    let config_path = temp_dir.join("nested").join("config.toml");

    // Ensure the directory doesn't exist initially
    if temp_dir.exists() {
        let _ = fs::remove_dir_all(&temp_dir);
    }
    assert!(!temp_dir.exists());

    // Generate config should create the directory structure
    let result = Config::generate_default_config(&config_path);
    assert!(result.is_ok());

    // Verify the directory was created
    assert!(config_path.exists());

    // Verify the file contains expected content and round-trips
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("# Taskthread Configuration File"));
    let loaded = Config::load_from_file(&config_path).unwrap();
    assert_eq!(loaded.storage.database_url, "sqlite::memory:");

    // Clean up
    let _ = fs::remove_dir_all(&temp_dir);
}

// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证导入配置读取与 schema 初始化
// ==========================================


use product_feed_import::config::{config_keys, ConfigManager, ImportConfigReader};
use product_feed_import::db::{read_schema_version, CURRENT_SCHEMA_VERSION};
use product_feed_import::ImportError;
use test_helpers::{create_test_db, insert_test_config, open_test_connection};

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_schema_version_recorded() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");

    let version = read_schema_version(&conn.lock().unwrap()).unwrap();
    assert_eq!(version, Some(CURRENT_SCHEMA_VERSION));
}

#[tokio::test]
async fn test_default_settings() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    let settings = config_manager.load_import_settings().await.unwrap();
    assert_eq!(settings.validation.max_cost, 1000.0);
    assert_eq!(settings.validation.min_cost, 5.0);
    assert_eq!(settings.validation.min_stock, 10);
    assert!(!settings.validation.legacy_code_required_message);
    assert_eq!(settings.delimiter, b',');
}

#[tokio::test]
async fn test_settings_from_config_kv() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    {
        let guard = conn.lock().unwrap();
        insert_test_config(&guard, config_keys::MAX_COST, "500").unwrap();
        insert_test_config(&guard, config_keys::MIN_COST, "2.5").unwrap();
        insert_test_config(&guard, config_keys::DELIMITER, "|").unwrap();
    }

    let config_manager = ConfigManager::from_connection(conn).unwrap();
    let settings = config_manager.load_import_settings().await.unwrap();

    assert_eq!(settings.validation.max_cost, 500.0);
    assert_eq!(settings.validation.min_cost, 2.5);
    assert_eq!(settings.validation.min_stock, 10);
    assert_eq!(settings.delimiter, b'|');
}

#[tokio::test]
async fn test_invalid_config_value_fails_load() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(&conn.lock().unwrap(), config_keys::MIN_COST, "cheap").unwrap();

    let config_manager = ConfigManager::from_connection(conn).unwrap();
    let result = config_manager.load_import_settings().await;

    match result {
        Err(ImportError::ConfigValueError { key, value, .. }) => {
            assert_eq!(key, config_keys::MIN_COST);
            assert_eq!(value, "cheap");
        }
        other => panic!("expected ConfigValueError, got {:?}", other),
    }
}

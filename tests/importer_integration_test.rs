// ==========================================
// ProductImporter 集成测试
// ==========================================
// 测试目标: 验证完整的商品导入流程（SQLite 落库）
// ==========================================


use product_feed_import::config::config_keys;
use product_feed_import::logging;
use product_feed_import::repository::{ImportBatchRepository, ProductRepository};
use product_feed_import::{ImportError, ProductImporter};
use test_helpers::{
    create_test_db, create_test_importer, fixture_path, insert_test_config, open_test_connection,
    write_feed,
};

#[tokio::test]
async fn test_import_mixed_feed() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let importer = create_test_importer(conn).expect("Failed to create importer");

    let report = importer
        .import_from_csv(fixture_path("mixed_feed.csv"))
        .await
        .expect("Import should succeed");

    assert_eq!(
        report.render_lines(),
        vec![
            "1/3 products imported",
            "Errors:",
            "Stock Level must be greater than 10 to import with a cost lower than £5 (Line 3)",
            "Incorrect number of columns (Line 4)",
        ]
    );

    // P001 已落库，未停产
    let product = importer
        .product_repo()
        .find_by_code("P001")
        .unwrap()
        .expect("P001 should be stored");
    assert_eq!(product.name, "Widget");
    assert_eq!(product.stock, 20);
    assert_eq!(product.cost, 4.5);
    assert!(!product.discontinued);
    assert!(product.discontinued_at.is_none());

    assert!(importer.product_repo().find_by_code("P002").unwrap().is_none());
    assert!(importer.product_repo().find_by_code("P003").unwrap().is_none());
}

#[tokio::test]
async fn test_blank_lines_keep_line_numbers() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let importer = create_test_importer(conn.clone()).expect("Failed to create importer");

    let report = importer
        .import_from_csv(fixture_path("blank_line_feed.csv"))
        .await
        .expect("Import should succeed");

    // 空行与纯空白行各占一个行号，计入总数
    assert_eq!(report.total_count(), 5);
    assert_eq!(
        report.render_lines(),
        vec![
            "2/5 products imported",
            "Errors:",
            "Incorrect number of columns (Line 3)",
            "Stock Level must be greater than 10 to import with a cost lower than £5 (Line 4)",
            "Incorrect number of columns (Line 5)",
        ]
    );

    assert!(importer.product_repo().find_by_code("P001").unwrap().is_some());
    assert!(importer.product_repo().find_by_code("P003").unwrap().is_some());

    let batch_repo = ImportBatchRepository::from_connection(conn);
    let batch_ids = batch_repo.list_recent(10).unwrap();
    let batch = batch_repo.find_by_id(&batch_ids[0]).unwrap().unwrap();
    assert_eq!(batch.total_rows, 5);
    assert_eq!(batch.rejected_rows, 3);
}

#[tokio::test]
async fn test_import_valid_feed() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let importer = create_test_importer(conn).expect("Failed to create importer");

    let report = importer
        .import_from_csv(fixture_path("valid_feed.csv"))
        .await
        .expect("Import should succeed");

    assert_eq!(report.imported_count(), 4);
    assert_eq!(report.total_count(), 4);
    assert!(!report.has_errors());
    assert_eq!(importer.product_repo().count().unwrap(), 4);

    // 停产标记与停产时间一致
    let discontinued = importer
        .product_repo()
        .find_by_code("P0002")
        .unwrap()
        .unwrap();
    assert!(discontinued.discontinued);
    assert!(discontinued.discontinued_at.is_some());

    let active = importer
        .product_repo()
        .find_by_code("P0003")
        .unwrap()
        .unwrap();
    assert!(!active.discontinued);
    assert!(active.discontinued_at.is_none());

    // 引号内的分隔符与转义引号
    let quoted = importer
        .product_repo()
        .find_by_code("P0004")
        .unwrap()
        .unwrap();
    assert_eq!(quoted.name, "Bluray, 4K");
    assert_eq!(quoted.description, r#"The "best" player"#);
}

#[tokio::test]
async fn test_reimport_rejects_every_line() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let importer = create_test_importer(conn).expect("Failed to create importer");
    let feed = fixture_path("valid_feed.csv");

    let first = importer.import_from_csv(&feed).await.unwrap();
    assert_eq!(first.imported_count(), 4);

    let second = importer.import_from_csv(&feed).await.unwrap();
    assert_eq!(second.imported_count(), 0);
    assert_eq!(second.total_count(), 4);

    let lines: Vec<String> = second.errors().iter().map(|e| e.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "Product Code must be unique in Products Table (Line 2)",
            "Product Code must be unique in Products Table (Line 3)",
            "Product Code must be unique in Products Table (Line 4)",
            "Product Code must be unique in Products Table (Line 5)",
        ]
    );
    assert_eq!(importer.product_repo().count().unwrap(), 4);
}

#[tokio::test]
async fn test_invalid_feed_reports_every_violation() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let importer = create_test_importer(conn).expect("Failed to create importer");

    let report = importer
        .import_from_csv(fixture_path("invalid_feed.csv"))
        .await
        .unwrap();

    assert_eq!(
        report.render_lines(),
        vec![
            "1/6 products imported",
            "Errors:",
            "Product Code is required (Line 2)",
            "Product Name is required (Line 3)",
            "Product Description is required (Line 3)",
            "Stock Level must be an integer (Line 3)",
            "Stock Level must be greater than 10 to import with a cost lower than £5 (Line 3)",
            "Cost must be numeric (Line 3)",
            "Discontinued can only be 'yes','no' or empty (Line 3)",
            "Cost must be less than £1000 (Line 4)",
            "Stock Level must be greater than 10 to import with a cost lower than £5 (Line 5)",
            "Stock Level is required (Line 7)",
            "Discontinued can only be 'yes','no' or empty (Line 7)",
        ]
    );

    // 第 5 行被拒绝，不占用编码，第 6 行同编码可导入
    let stored = importer
        .product_repo()
        .find_by_code("P0013")
        .unwrap()
        .unwrap();
    assert_eq!(stored.stock, 50);
}

#[tokio::test]
async fn test_duplicate_code_within_feed() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let temp_dir = tempfile::tempdir().unwrap();
    let feed = write_feed(
        temp_dir.path(),
        "dupes.csv",
        &[
            "P100,Lamp,Desk lamp,15,12.00,",
            "P100,Lamp,Desk lamp,15,12.00,",
        ],
    )
    .unwrap();

    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let importer = create_test_importer(conn).expect("Failed to create importer");
    let report = importer.import_from_csv(&feed).await.unwrap();

    assert_eq!(report.summary_line(), "1/2 products imported");
    assert_eq!(
        report.errors()[0].to_string(),
        "Product Code must be unique in Products Table (Line 3)"
    );
}

#[tokio::test]
async fn test_header_only_feed() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let temp_dir = tempfile::tempdir().unwrap();
    let feed = write_feed(temp_dir.path(), "empty.csv", &[]).unwrap();

    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let importer = create_test_importer(conn).expect("Failed to create importer");
    let report = importer.import_from_csv(&feed).await.unwrap();

    assert_eq!(report.render_lines(), vec!["0/0 products imported"]);
}

#[tokio::test]
async fn test_missing_feed_file() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let importer = create_test_importer(conn.clone()).expect("Failed to create importer");

    let result = importer.import_from_csv("tests/fixtures/no_such_feed.csv").await;

    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    assert_eq!(importer.product_repo().count().unwrap(), 0);

    // 未写入批次记录
    let batches = ImportBatchRepository::from_connection(conn)
        .list_recent(10)
        .unwrap();
    assert!(batches.is_empty());
}

#[tokio::test]
async fn test_batch_log_is_written() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let importer = create_test_importer(conn.clone()).expect("Failed to create importer");

    importer
        .import_from_csv(fixture_path("mixed_feed.csv"))
        .await
        .unwrap();

    let batch_repo = ImportBatchRepository::from_connection(conn);
    let batch_ids = batch_repo.list_recent(10).unwrap();
    assert_eq!(batch_ids.len(), 1);

    let batch = batch_repo.find_by_id(&batch_ids[0]).unwrap().unwrap();
    assert_eq!(batch.file_name.as_deref(), Some("mixed_feed.csv"));
    assert_eq!(batch.total_rows, 3);
    assert_eq!(batch.imported_rows, 1);
    assert_eq!(batch.rejected_rows, 2);
    assert_eq!(batch.error_count, 2);

    let errors: serde_json::Value =
        serde_json::from_str(batch.error_report_json.as_deref().unwrap()).unwrap();
    assert_eq!(errors[1]["line_number"], 4);
    assert_eq!(errors[1]["message"], "Incorrect number of columns");
}

#[tokio::test]
async fn test_config_overrides_apply() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    {
        let guard = conn.lock().unwrap();
        insert_test_config(&guard, config_keys::LEGACY_CODE_REQUIRED_MESSAGE, "true").unwrap();
        insert_test_config(&guard, config_keys::MIN_STOCK, "2").unwrap();
        insert_test_config(&guard, config_keys::DELIMITER, ";").unwrap();
    }

    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("semicolon.csv");
    std::fs::write(
        &path,
        "code;name;desc;stock;cost;disc\n;Widget;A widget;20;4.50;no\nP200;Clip;Paper clip;3;0.10;\n",
    )
    .unwrap();

    let importer = create_test_importer(conn).expect("Failed to create importer");
    let report = importer.import_from_csv(&path).await.unwrap();

    assert_eq!(report.summary_line(), "1/2 products imported");
    assert_eq!(
        report.errors()[0].to_string(),
        "Product Name is required (Line 2)"
    );
}

// ==========================================
// 商品数据导入工具 - 命令行入口
// ==========================================
// 用法: product-feed-import <FEED_CSV> [--import-dir DIR] [--db-path PATH] [--verbose]
//       [--lenient-missing]
// 退出码: 0 完成（含逐行错误） / 2 文件不存在 / 1 初始化或读取失败
// ==========================================

use anyhow::Context;
use clap::Parser;
use product_feed_import::config::{CliConfig, ConfigManager};
use product_feed_import::db::{init_schema, open_sqlite_connection};
use product_feed_import::{
    logging, ImportBatchRepository, ImportError, ProductImporter, ProductImporterImpl,
    ProductRepositoryImpl,
};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

const EXIT_FAILURE: u8 = 1;
const EXIT_FILE_NOT_FOUND: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let config = CliConfig::parse();

    // 初始化日志（写 stderr）
    logging::init(config.verbose);

    tracing::info!(version = product_feed_import::VERSION, "{}", product_feed_import::APP_NAME);
    tracing::debug!(?config, "命令行参数");

    match run(&config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "导入失败");
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(config: &CliConfig) -> anyhow::Result<ExitCode> {
    let db_path = config.resolve_db_path();
    tracing::info!(db_path = %db_path, "使用数据库");

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_schema(&conn).context("数据库初始化失败")?;
    let conn = Arc::new(Mutex::new(conn));

    let importer = ProductImporterImpl::new(
        ProductRepositoryImpl::from_connection(conn.clone()),
        ConfigManager::from_connection(conn.clone())?,
    )
    .with_batch_log(ImportBatchRepository::from_connection(conn));

    let feed_path = config.resolve_feed_path();

    match importer.import_from_csv(&feed_path).await {
        Ok(report) => {
            for line in report.render_lines() {
                println!("{}", line);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(ImportError::FileNotFound(path)) => {
            println!("Import file \"{}\" not found", path);
            println!("No lines to import");
            if config.lenient_missing {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_FILE_NOT_FOUND))
            }
        }
        Err(e) => Err(e.into()),
    }
}

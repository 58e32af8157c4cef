// ==========================================
// 商品数据导入工具 - 默认路径
// ==========================================
// 优先级: 命令行参数 > 环境变量 > 默认值
// ==========================================

use std::path::PathBuf;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PRODUCT_FEED_DB_PATH";

/// 导入目录环境变量
pub const IMPORT_DIR_ENV: &str = "PRODUCT_FEED_IMPORT_DIR";

/// 默认导入目录（相对工作目录）
pub const DEFAULT_IMPORT_DIR: &str = "./storage/app/public/import";

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 获取默认数据库路径
///
/// 1. 环境变量 PRODUCT_FEED_DB_PATH
/// 2. 用户数据目录下的 product-feed-import/product_feed.db
/// 3. 当前目录 ./product_feed.db
pub fn get_default_db_path() -> String {
    if let Some(path) = non_empty_env(DB_PATH_ENV) {
        return path;
    }

    let mut path = PathBuf::from("./product_feed.db");

    if let Some(data_dir) = dirs::data_dir() {
        let app_dir = data_dir.join("product-feed-import");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&app_dir).is_ok() {
            path = app_dir.join("product_feed.db");
        }
    }

    path.to_string_lossy().to_string()
}

/// 获取默认导入目录
pub fn get_default_import_dir() -> String {
    non_empty_env(IMPORT_DIR_ENV).unwrap_or_else(|| DEFAULT_IMPORT_DIR.to_string())
}

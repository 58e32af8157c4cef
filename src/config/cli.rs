// ==========================================
// 商品数据导入工具 - 命令行参数
// ==========================================

use crate::config::paths::{get_default_db_path, get_default_import_dir};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "product-feed-import")]
#[command(about = "Import a product feed CSV into the product store", version)]
pub struct CliConfig {
    /// Feed 文件名（相对导入目录；绝对路径原样使用）
    pub feed_file: String,

    /// 导入目录（默认取 PRODUCT_FEED_IMPORT_DIR 或 ./storage/app/public/import）
    #[arg(long)]
    pub import_dir: Option<String>,

    /// 数据库路径（默认取 PRODUCT_FEED_DB_PATH 或用户数据目录）
    #[arg(long)]
    pub db_path: Option<String>,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Exit with status 0 when the feed file does not exist")]
    pub lenient_missing: bool,
}

impl CliConfig {
    /// 解析 Feed 文件完整路径
    pub fn resolve_feed_path(&self) -> PathBuf {
        let import_dir = self
            .import_dir
            .clone()
            .unwrap_or_else(get_default_import_dir);
        PathBuf::from(import_dir).join(&self.feed_file)
    }

    /// 解析数据库路径
    pub fn resolve_db_path(&self) -> String {
        self.db_path.clone().unwrap_or_else(get_default_db_path)
    }
}

// ==========================================
// 商品数据导入工具 - 配置层
// ==========================================
// 职责: 导入配置读取与覆写、默认路径、命令行参数
// 存储: config_kv 表
// ==========================================

pub mod cli;
pub mod config_manager;
pub mod import_config_trait;
pub mod paths;

// 重导出核心配置管理器
pub use cli::CliConfig;
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ImportConfigReader, ImportSettings};
pub use paths::{get_default_db_path, get_default_import_dir};

// ==========================================
// 商品数据导入工具 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 商品 Feed 校验与落库（逐行容错）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 解析/校验/落库
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ProductField, ValidationSettings};

// 领域实体
pub use domain::{ImportBatch, NewProduct, Product, ProductCandidate, RawRecord};

// 导入器
pub use importer::{
    CsvRecordParser, FieldValidator, ImportError, ImportReport, ImportResult, ProductImporter,
    ProductImporterImpl,
};

// 配置
pub use config::{ConfigManager, ImportConfigReader, ImportSettings};

// 仓储
pub use repository::{
    ImportBatchRepository, ProductRepository, ProductRepositoryImpl, RepositoryError,
    RepositoryResult,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "product-feed-import";

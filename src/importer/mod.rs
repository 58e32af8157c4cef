// ==========================================
// 商品数据导入工具 - 导入层
// ==========================================
// 职责: 商品 Feed 文件导入，逐行校验后落库
// 流程: 解析 → 列数检查 → 字段校验 → 类型转换 → 落库
// ==========================================

// 模块声明
pub mod error;
pub mod field_validator;
pub mod import_report;
pub mod product_importer_impl;
pub mod product_importer_trait;
pub mod record_parser;
pub mod transform;
pub mod value_parser;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_validator::{FieldRule, FieldValidator, RuleCheck, RuleContext, Violation, ViolationKind};
pub use import_report::{ImportReport, LineError};
pub use product_importer_impl::ProductImporterImpl;
pub use record_parser::{CsvRecordParser, FeedRecords};

// 重导出 Trait 接口
pub use product_importer_trait::{ProductImporter, RecordParser};

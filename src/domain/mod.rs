// ==========================================
// 商品数据导入工具 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含校验逻辑
// ==========================================

pub mod product;
pub mod types;

// 重导出核心类型
pub use product::{
    ColumnCountMismatch, ImportBatch, NewProduct, Product, ProductCandidate, RawRecord,
};
pub use types::{ProductField, ValidationSettings};

// ==========================================
// 商品数据导入工具 - 商品领域模型
// ==========================================
// 数据流: RawRecord → ProductCandidate → NewProduct → Product
// ==========================================

use crate::domain::types::ProductField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RawRecord - 原始记录
// ==========================================
// 用途: 文件解析产物，按位置排列的字段值（已 TRIM）
// 生命周期: 仅在导入流程内
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub line_number: usize,  // 行号（表头为第 1 行，数据从第 2 行开始）
    pub fields: Vec<String>, // 字段值（按列位置）
}

impl RawRecord {
    pub fn new(line_number: usize, fields: Vec<String>) -> Self {
        Self {
            line_number,
            fields,
        }
    }
}

// ==========================================
// ColumnCountMismatch - 列数不匹配
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCountMismatch {
    pub line_number: usize,
    pub expected: usize,
    pub actual: usize,
}

// ==========================================
// ProductCandidate - 待校验商品
// ==========================================
// 用途: RawRecord 与固定 schema 按位置对齐后的结果
// 说明: 字段值保持字符串，类型转换在校验/转换阶段完成
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCandidate {
    pub line_number: usize,
    pub code: String,
    pub name: String,
    pub description: String,
    pub stock: String,
    pub cost: String,
    pub discontinued: String,
}

impl ProductCandidate {
    /// 将原始记录与 Feed schema 按位置对齐
    ///
    /// # 返回
    /// - Ok(ProductCandidate): 列数一致
    /// - Err(ColumnCountMismatch): 列数不一致（该行不做字段校验）
    pub fn try_from_record(record: RawRecord) -> Result<Self, ColumnCountMismatch> {
        let expected = ProductField::FEED_ORDER.len();
        if record.fields.len() != expected {
            return Err(ColumnCountMismatch {
                line_number: record.line_number,
                expected,
                actual: record.fields.len(),
            });
        }

        let mut values = record.fields.into_iter();
        let mut next = || values.next().unwrap_or_default();

        Ok(Self {
            line_number: record.line_number,
            code: next(),
            name: next(),
            description: next(),
            stock: next(),
            cost: next(),
            discontinued: next(),
        })
    }

    /// 按字段读取原始值
    pub fn value(&self, field: ProductField) -> &str {
        match field {
            ProductField::Code => &self.code,
            ProductField::Name => &self.name,
            ProductField::Description => &self.description,
            ProductField::Stock => &self.stock,
            ProductField::Cost => &self.cost,
            ProductField::Discontinued => &self.discontinued,
        }
    }
}

// ==========================================
// NewProduct - 待落库商品
// ==========================================
// 用途: 校验通过后的类型化结果，交给 ProductRepository 落库
// 红线: discontinued_at 有值 当且仅当 discontinued = true
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub description: String,
    pub stock: i64,
    pub cost: f64, // 保留 2 位小数
    pub discontinued: bool,
    pub discontinued_at: Option<DateTime<Utc>>,
}

// ==========================================
// Product - 已落库商品
// ==========================================
// 对齐: product_data 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    // ===== 主键 =====
    pub code: String,

    // ===== 基础信息 =====
    pub name: String,
    pub description: String,
    pub stock: i64,
    pub cost: f64,

    // ===== 停产信息 =====
    pub discontinued: bool,
    pub discontinued_at: Option<DateTime<Utc>>,

    // ===== 审计字段（仓储层赋值）=====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// ImportBatch - 导入批次
// ==========================================
// 用途: 记录一次导入运行的元信息
// 对齐: import_batch 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,                   // 批次 ID（UUID）
    pub file_name: Option<String>,          // 源文件名
    pub file_path: Option<String>,          // 源文件路径
    pub total_rows: i64,                    // 数据行数（不含表头）
    pub imported_rows: i64,                 // 成功导入行数
    pub rejected_rows: i64,                 // 被拒绝行数
    pub error_count: i64,                   // 错误条数（一行可能多条）
    pub imported_at: DateTime<Utc>,         // 导入完成时间
    pub elapsed_ms: Option<i64>,            // 导入耗时（毫秒）
    pub error_report_json: Option<String>,  // 错误明细 JSON
}

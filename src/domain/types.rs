// ==========================================
// 商品数据导入工具 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 商品字段 (Product Field)
// ==========================================
// 红线: Feed 列顺序固定，只信任位置，不信任表头名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductField {
    Code,         // 商品编码（唯一键）
    Name,         // 商品名称
    Description,  // 商品描述
    Stock,        // 库存
    Cost,         // 成本（GBP）
    Discontinued, // 停产标记
}

impl ProductField {
    /// Feed 列顺序（位置即语义）
    pub const FEED_ORDER: [ProductField; 6] = [
        ProductField::Code,
        ProductField::Name,
        ProductField::Description,
        ProductField::Stock,
        ProductField::Cost,
        ProductField::Discontinued,
    ];
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductField::Code => write!(f, "code"),
            ProductField::Name => write!(f, "name"),
            ProductField::Description => write!(f, "description"),
            ProductField::Stock => write!(f, "stock"),
            ProductField::Cost => write!(f, "cost"),
            ProductField::Discontinued => write!(f, "discontinued"),
        }
    }
}

// ==========================================
// 校验阈值 (Validation Settings)
// ==========================================
// 默认值: 成本上限 1000，低价阈值 5，低库存阈值 10
// 交叉规则: cost > min_cost 或 stock > min_stock 任一成立即通过（严格大于）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    pub max_cost: f64,  // 成本上限（含）
    pub min_cost: f64,  // 低价阈值
    pub min_stock: i64, // 低库存阈值

    // 为 true 时保留历史行为：编码为空提示 "Product Name is required"
    pub legacy_code_required_message: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_cost: 1000.0,
            min_cost: 5.0,
            min_stock: 10,
            legacy_code_required_message: false,
        }
    }
}

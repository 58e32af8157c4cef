// ==========================================
// 商品数据导入工具 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::ValidationSettings;
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportSettings - 一次导入使用的配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
    pub validation: ValidationSettings,
    pub delimiter: u8,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            validation: ValidationSettings::default(),
            delimiter: b',',
        }
    }
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 校验阈值 =====

    /// 获取成本上限
    ///
    /// # 默认值
    /// - 1000
    async fn get_max_cost(&self) -> ImportResult<f64>;

    /// 获取低价阈值（交叉规则）
    ///
    /// # 默认值
    /// - 5
    async fn get_min_cost(&self) -> ImportResult<f64>;

    /// 获取低库存阈值（交叉规则）
    ///
    /// # 默认值
    /// - 10
    async fn get_min_stock(&self) -> ImportResult<i64>;

    /// 编码为空时是否沿用历史提示 "Product Name is required"
    ///
    /// # 默认值
    /// - false
    async fn get_legacy_code_required_message(&self) -> ImportResult<bool>;

    // ===== 文件格式 =====

    /// 获取字段分隔符（单个 ASCII 字符）
    ///
    /// # 默认值
    /// - ','
    async fn get_delimiter(&self) -> ImportResult<u8>;

    /// 一次性读取全部导入配置
    async fn load_import_settings(&self) -> ImportResult<ImportSettings> {
        Ok(ImportSettings {
            validation: ValidationSettings {
                max_cost: self.get_max_cost().await?,
                min_cost: self.get_min_cost().await?,
                min_stock: self.get_min_stock().await?,
                legacy_code_required_message: self.get_legacy_code_required_message().await?,
            },
            delimiter: self.get_delimiter().await?,
        })
    }
}

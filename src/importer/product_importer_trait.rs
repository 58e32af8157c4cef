// ==========================================
// 商品数据导入工具 - 导入 Trait
// ==========================================
// 职责: 定义商品导入接口（不包含实现）
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::import_report::ImportReport;
use async_trait::async_trait;
use std::io::Read;
use std::path::Path;

// ==========================================
// ProductImporter Trait
// ==========================================
// 用途: 商品导入主接口
// 实现者: ProductImporterImpl
#[async_trait]
pub trait ProductImporter: Send + Sync {
    /// 从 CSV 文件导入商品数据
    ///
    /// # 参数
    /// - file_path: Feed 文件路径（首行为表头）
    ///
    /// # 返回
    /// - Ok(ImportReport): 导入报告（逐行错误已记入报告）
    /// - Err(FileNotFound): 文件不存在，未导入任何数据
    /// - Err: 配置读取失败、文件读取中断等整次导入级别错误
    ///
    /// # 导入流程
    /// 1. 文件读取与解析（跳过表头）
    /// 2. 列数检查
    /// 3. 字段校验（含编码查重、库存/成本交叉规则）
    /// 4. 类型转换（停产标记 → bool，停产时间）
    /// 5. 落库（逐行）
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport>;

    /// 从任意读取源导入（流程同 import_from_csv，不写批次记录）
    async fn import_from_reader<Rd: Read + Send>(&self, reader: Rd) -> ImportResult<ImportReport>;
}

// ==========================================
// RecordParser Trait
// ==========================================
// 用途: 单行解析接口（阶段 0）
// 实现者: CsvRecordParser
pub trait RecordParser: Send + Sync {
    /// 将一行原始文本拆分为按位置排列的字段
    ///
    /// # 说明
    /// - 支持引号包裹的分隔符与转义引号
    /// - 不做内容校验
    fn parse_line(&self, raw_line: &str) -> ImportResult<Vec<String>>;
}

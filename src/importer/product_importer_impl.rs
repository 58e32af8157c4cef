// ==========================================
// 商品数据导入工具 - 商品导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 列数检查 → 字段校验 → 类型转换 → 落库
// 约束: 逐行顺序处理；单行失败记入报告，不中断导入
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::product::{ImportBatch, ProductCandidate, RawRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_validator::FieldValidator;
use crate::importer::import_report::ImportReport;
use crate::importer::product_importer_trait::ProductImporter;
use crate::importer::record_parser::CsvRecordParser;
use crate::importer::transform::to_new_product;
use crate::repository::{ImportBatchRepository, ProductRepository};
use chrono::Utc;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 落库失败的行级错误前缀
pub const MSG_PERSISTENCE_FAILURE: &str = "Could not save product";

/// 无法解码的记录的行级错误前缀
pub const MSG_UNREADABLE_RECORD: &str = "Unreadable record";

// ==========================================
// ProductImporterImpl - 商品导入器实现
// ==========================================
pub struct ProductImporterImpl<R, C>
where
    R: ProductRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    product_repo: R,

    // 配置读取器
    config: C,

    // 批次审计（可选）
    batch_repo: Option<ImportBatchRepository>,
}

impl<R, C> ProductImporterImpl<R, C>
where
    R: ProductRepository,
    C: ImportConfigReader,
{
    /// 创建新的 ProductImporter 实例
    ///
    /// # 参数
    /// - product_repo: 商品仓储（查重与落库共用同一连接）
    /// - config: 配置读取器
    pub fn new(product_repo: R, config: C) -> Self {
        Self {
            product_repo,
            config,
            batch_repo: None,
        }
    }

    /// 挂载批次审计仓储，文件导入结束后写入 import_batch
    pub fn with_batch_log(mut self, batch_repo: ImportBatchRepository) -> Self {
        self.batch_repo = Some(batch_repo);
        self
    }

    pub fn product_repo(&self) -> &R {
        &self.product_repo
    }

    /// 逐行处理记录流
    ///
    /// # 返回
    /// - Ok(ImportReport): 全部行已处理
    /// - Err: 文件读取中断（I/O 错误）
    fn process_records<I>(&self, records: I, validator: &FieldValidator) -> ImportResult<ImportReport>
    where
        I: Iterator<Item = ImportResult<RawRecord>>,
    {
        let mut report = ImportReport::new();

        for item in records {
            let record = match item {
                Ok(record) => record,
                Err(ImportError::UnreadableRecord { row, message }) => {
                    warn!(line = row, error = %message, "记录无法解析");
                    report.record_line_seen();
                    report.record_error(row, format!("{}: {}", MSG_UNREADABLE_RECORD, message));
                    continue;
                }
                Err(e) => return Err(e),
            };

            report.record_line_seen();
            self.process_record(record, validator, &mut report);
        }

        Ok(report)
    }

    /// 处理单行：列数检查 → 校验 → 转换 → 落库
    fn process_record(&self, record: RawRecord, validator: &FieldValidator, report: &mut ImportReport) {
        // === 列数检查 ===
        let candidate = match ProductCandidate::try_from_record(record) {
            Ok(candidate) => candidate,
            Err(mismatch) => {
                debug!(
                    line = mismatch.line_number,
                    expected = mismatch.expected,
                    actual = mismatch.actual,
                    "列数不匹配"
                );
                report.record_column_mismatch(mismatch.line_number);
                return;
            }
        };
        let line = candidate.line_number;

        // === 字段校验 ===
        let violations = match validator.validate(&candidate, &self.product_repo) {
            Ok(violations) => violations,
            Err(e) => {
                warn!(line = line, code = %candidate.code, error = %e, "查重失败");
                report.record_error(line, format!("{}: {}", MSG_PERSISTENCE_FAILURE, e));
                return;
            }
        };
        if !violations.is_empty() {
            for violation in &violations {
                debug!(line = line, field = %violation.field, kind = ?violation.kind, "字段校验未通过");
            }
            report.record_violations(line, &violations);
            return;
        }

        // === 类型转换 ===
        let product = match to_new_product(&candidate, Utc::now()) {
            Ok(product) => product,
            Err(e) => {
                warn!(line = line, error = %e, "类型转换失败");
                report.record_error(line, e.to_string());
                return;
            }
        };

        // === 落库 ===
        match self.product_repo.save(product) {
            Ok(saved) => {
                debug!(line = line, code = %saved.code, "商品已导入");
                report.record_imported();
            }
            Err(e) => {
                warn!(line = line, code = %candidate.code, error = %e, "商品落库失败");
                report.record_error(line, format!("{}: {}", MSG_PERSISTENCE_FAILURE, e));
            }
        }
    }

    /// 写入批次审计记录（失败只记日志）
    fn record_batch(&self, batch_id: &str, file_path: &Path, report: &ImportReport, elapsed_ms: i64) {
        let Some(batch_repo) = &self.batch_repo else {
            return;
        };

        let error_report_json = match serde_json::to_string(report.errors()) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!(error = %e, "错误明细序列化失败");
                None
            }
        };

        let batch = ImportBatch {
            batch_id: batch_id.to_string(),
            file_name: file_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            file_path: Some(file_path.display().to_string()),
            total_rows: report.total_count() as i64,
            imported_rows: report.imported_count() as i64,
            rejected_rows: report.rejected_count() as i64,
            error_count: report.errors().len() as i64,
            imported_at: Utc::now(),
            elapsed_ms: Some(elapsed_ms),
            error_report_json,
        };

        if let Err(e) = batch_repo.insert_batch(&batch) {
            warn!(batch_id = %batch_id, error = %e, "批次记录写入失败");
        }
    }
}

#[async_trait::async_trait]
impl<R, C> ProductImporter for ProductImporterImpl<R, C>
where
    R: ProductRepository,
    C: ImportConfigReader,
{
    #[instrument(skip(self, file_path), fields(batch_id))]
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let file_path = file_path.as_ref();
        info!(file_path = %file_path.display(), "开始导入商品数据");

        let settings = self.config.load_import_settings().await?;
        let parser = CsvRecordParser::new(settings.delimiter);
        let validator = FieldValidator::new(&settings.validation);

        // === 步骤 1: 打开文件 ===
        let records = parser.open(file_path).map_err(|e| {
            warn!(error = %e, "Feed 文件无法打开");
            e
        })?;

        // === 步骤 2: 逐行处理 ===
        let report = self.process_records(records, &validator)?;
        let elapsed_ms = start_time.elapsed().as_millis() as i64;

        // === 步骤 3: 记录批次信息 ===
        self.record_batch(&batch_id, file_path, &report, elapsed_ms);

        info!(
            total = report.total_count(),
            imported = report.imported_count(),
            errors = report.errors().len(),
            elapsed_ms = elapsed_ms,
            "商品数据导入完成"
        );

        Ok(report)
    }

    async fn import_from_reader<Rd: Read + Send>(&self, reader: Rd) -> ImportResult<ImportReport> {
        let settings = self.config.load_import_settings().await?;
        let parser = CsvRecordParser::new(settings.delimiter);
        let validator = FieldValidator::new(&settings.validation);

        let report = self.process_records(parser.records_from(reader), &validator)?;
        debug!(
            total = report.total_count(),
            imported = report.imported_count(),
            "读取源导入完成"
        );

        Ok(report)
    }
}

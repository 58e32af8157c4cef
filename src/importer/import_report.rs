// ==========================================
// 商品数据导入工具 - 导入报告
// ==========================================
// 职责: 累计一次导入的行计数、成功计数与逐行错误
// 输出格式:
//   <imported>/<total> products imported
//   Errors:
//   <message> (Line N)
// ==========================================

use crate::importer::field_validator::{Violation, MSG_COLUMN_COUNT_MISMATCH};
use serde::Serialize;
use std::fmt;

// ==========================================
// LineError - 带行号的错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineError {
    pub line_number: usize,
    pub message: String,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Line {})", self.message, self.line_number)
    }
}

// ==========================================
// ImportReport
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    imported_count: usize,
    total_count: usize,
    errors: Vec<LineError>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录读到一条数据行（无论是否合法）
    pub fn record_line_seen(&mut self) {
        self.total_count += 1;
    }

    /// 记录一条成功落库
    pub fn record_imported(&mut self) {
        self.imported_count += 1;
    }

    /// 记录一条行级错误
    pub fn record_error(&mut self, line_number: usize, message: impl Into<String>) {
        self.errors.push(LineError {
            line_number,
            message: message.into(),
        });
    }

    /// 记录列数不匹配
    pub fn record_column_mismatch(&mut self, line_number: usize) {
        self.record_error(line_number, MSG_COLUMN_COUNT_MISMATCH);
    }

    /// 记录字段违规（每条违规一行）
    pub fn record_violations(&mut self, line_number: usize, violations: &[Violation]) {
        for violation in violations {
            self.record_error(line_number, violation.message.clone());
        }
    }

    pub fn imported_count(&self) -> usize {
        self.imported_count
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// 被拒绝的数据行数
    pub fn rejected_count(&self) -> usize {
        self.total_count.saturating_sub(self.imported_count)
    }

    pub fn errors(&self) -> &[LineError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 汇总行
    pub fn summary_line(&self) -> String {
        format!(
            "{}/{} products imported",
            self.imported_count, self.total_count
        )
    }

    /// 完整输出（汇总行 + 错误明细）
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![self.summary_line()];
        if self.has_errors() {
            lines.push("Errors:".to_string());
            lines.extend(self.errors.iter().map(LineError::to_string));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ProductField;
    use crate::importer::field_validator::ViolationKind;

    #[test]
    fn test_empty_report_renders_summary_only() {
        let report = ImportReport::new();
        assert_eq!(report.render_lines(), vec!["0/0 products imported"]);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_report_counts_and_errors() {
        let mut report = ImportReport::new();

        report.record_line_seen();
        report.record_imported();

        report.record_line_seen();
        report.record_violations(
            3,
            &[Violation {
                field: ProductField::Stock,
                kind: ViolationKind::InvalidStockCostPair,
                message: "Stock Level must be greater than 10 to import with a cost lower than £5"
                    .to_string(),
            }],
        );

        report.record_line_seen();
        report.record_column_mismatch(4);

        assert_eq!(report.imported_count(), 1);
        assert_eq!(report.total_count(), 3);
        assert_eq!(report.rejected_count(), 2);
        assert_eq!(
            report.render_lines(),
            vec![
                "1/3 products imported",
                "Errors:",
                "Stock Level must be greater than 10 to import with a cost lower than £5 (Line 3)",
                "Incorrect number of columns (Line 4)",
            ]
        );
    }
}

// ==========================================
// 商品数据导入工具 - 导入批次仓储
// ==========================================
// 职责: import_batch 表读写（导入审计）
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::product::ImportBatch;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo_impl::parse_timestamp;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// import_batch 行结构（imported_at 为 RFC3339 文本）
struct BatchRow {
    batch_id: String,
    file_name: Option<String>,
    file_path: Option<String>,
    total_rows: i64,
    imported_rows: i64,
    rejected_rows: i64,
    error_count: i64,
    imported_at: String,
    elapsed_ms: Option<i64>,
    error_report_json: Option<String>,
}

impl BatchRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            batch_id: row.get(0)?,
            file_name: row.get(1)?,
            file_path: row.get(2)?,
            total_rows: row.get(3)?,
            imported_rows: row.get(4)?,
            rejected_rows: row.get(5)?,
            error_count: row.get(6)?,
            imported_at: row.get(7)?,
            elapsed_ms: row.get(8)?,
            error_report_json: row.get(9)?,
        })
    }

    fn into_batch(self) -> RepositoryResult<ImportBatch> {
        Ok(ImportBatch {
            imported_at: parse_timestamp("imported_at", &self.imported_at)?,
            batch_id: self.batch_id,
            file_name: self.file_name,
            file_path: self.file_path,
            total_rows: self.total_rows,
            imported_rows: self.imported_rows,
            rejected_rows: self.rejected_rows,
            error_count: self.error_count,
            elapsed_ms: self.elapsed_ms,
            error_report_json: self.error_report_json,
        })
    }
}

/// 导入批次仓储
pub struct ImportBatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ImportBatchRepository {
    /// 创建新的 ImportBatchRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入批次记录
    pub fn insert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, file_name, file_path, total_rows, imported_rows,
                rejected_rows, error_count, imported_at, elapsed_ms, error_report_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                batch.batch_id,
                batch.file_name,
                batch.file_path,
                batch.total_rows,
                batch.imported_rows,
                batch.rejected_rows,
                batch.error_count,
                batch.imported_at.to_rfc3339(),
                batch.elapsed_ms,
                batch.error_report_json,
            ],
        )?;

        Ok(())
    }

    /// 按批次 ID 查询
    pub fn find_by_id(&self, batch_id: &str) -> RepositoryResult<Option<ImportBatch>> {
        let conn = self.get_conn()?;

        let row = conn
            .query_row(
                r#"
                SELECT batch_id, file_name, file_path, total_rows, imported_rows,
                       rejected_rows, error_count, imported_at, elapsed_ms, error_report_json
                FROM import_batch
                WHERE batch_id = ?1
                "#,
                params![batch_id],
                BatchRow::from_row,
            )
            .optional()?;

        row.map(BatchRow::into_batch).transpose()
    }

    /// 最近的批次（按导入时间倒序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT batch_id FROM import_batch ORDER BY imported_at DESC LIMIT ?1",
        )?;
        let ids = stmt
            .query_map(params![limit as i64], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }
}

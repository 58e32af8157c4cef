// ==========================================
// 商品数据导入工具 - 商品仓储实现
// ==========================================
// 职责: 实现 product_data 表访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::product::{NewProduct, Product};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::ProductRepository;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 解析 RFC3339 时间字段
pub(crate) fn parse_timestamp(field: &str, raw: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("{} ({})", e, raw),
        })
}

// ==========================================
// ProductRepositoryImpl
// ==========================================
pub struct ProductRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepositoryImpl {
    /// 创建新的 Repository 实例（会确保表结构存在）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

// ==========================================
// ProductRow - product_data 行结构
// ==========================================
struct ProductRow {
    code: String,
    name: String,
    description: String,
    stock: i64,
    cost: Option<f64>,
    discontinued: i64,
    discontinued_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ProductRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            code: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            stock: row.get(3)?,
            cost: row.get(4)?,
            discontinued: row.get(5)?,
            discontinued_at: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_product(self) -> RepositoryResult<Product> {
        Ok(Product {
            code: self.code,
            name: self.name,
            description: self.description,
            stock: self.stock,
            cost: self.cost.unwrap_or_default(),
            discontinued: self.discontinued != 0,
            discontinued_at: self
                .discontinued_at
                .as_deref()
                .map(|raw| parse_timestamp("discontinued_at", raw))
                .transpose()?,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

impl ProductRepository for ProductRepositoryImpl {
    fn exists_by_code(&self, code: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;

        let exists = conn
            .query_row(
                "SELECT 1 FROM product_data WHERE product_code = ?1 LIMIT 1",
                params![code],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        Ok(exists)
    }

    /// 插入新商品（INSERT，不做 upsert）
    ///
    /// # 说明
    /// - created_at / updated_at 使用当前时间
    /// - 编码重复时返回 UniqueConstraintViolation，不覆盖已有数据
    fn save(&self, product: NewProduct) -> RepositoryResult<Product> {
        let conn = self.get_conn()?;
        let now = Utc::now();

        conn.execute(
            r#"
            INSERT INTO product_data (
                product_code, product_name, product_desc, stock, cost,
                discontinued, discontinued_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                product.code,
                product.name,
                product.description,
                product.stock,
                product.cost,
                product.discontinued as i32,
                product.discontinued_at.map(|dt| dt.to_rfc3339()),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(Product {
            code: product.code,
            name: product.name,
            description: product.description,
            stock: product.stock,
            cost: product.cost,
            discontinued: product.discontinued,
            discontinued_at: product.discontinued_at,
            created_at: now,
            updated_at: now,
        })
    }

    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;

        let row = conn
            .query_row(
                r#"
                SELECT product_code, product_name, product_desc, stock, cost,
                       discontinued, discontinued_at, created_at, updated_at
                FROM product_data
                WHERE product_code = ?1
                "#,
                params![code],
                ProductRow::from_row,
            )
            .optional()?;

        row.map(ProductRow::into_product).transpose()
    }

    fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM product_data", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_repo() -> (NamedTempFile, ProductRepositoryImpl) {
        let temp_file = NamedTempFile::new().unwrap();
        let repo = ProductRepositoryImpl::new(temp_file.path().to_str().unwrap()).unwrap();
        (temp_file, repo)
    }

    fn new_product(code: &str, discontinued: bool) -> NewProduct {
        NewProduct {
            code: code.to_string(),
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            stock: 20,
            cost: 4.5,
            discontinued,
            discontinued_at: if discontinued { Some(Utc::now()) } else { None },
        }
    }

    #[test]
    fn test_save_and_find_by_code() {
        let (_temp, repo) = create_repo();

        let saved = repo.save(new_product("P001", false)).unwrap();
        assert_eq!(saved.created_at, saved.updated_at);

        let found = repo.find_by_code("P001").unwrap().unwrap();
        assert_eq!(found.code, "P001");
        assert_eq!(found.stock, 20);
        assert!((found.cost - 4.5).abs() < f64::EPSILON);
        assert!(!found.discontinued);
        assert!(found.discontinued_at.is_none());
    }

    #[test]
    fn test_discontinued_timestamp_round_trip() {
        let (_temp, repo) = create_repo();

        repo.save(new_product("P002", true)).unwrap();

        let found = repo.find_by_code("P002").unwrap().unwrap();
        assert!(found.discontinued);
        assert!(found.discontinued_at.is_some());
    }

    #[test]
    fn test_exists_by_code_sees_own_writes() {
        let (_temp, repo) = create_repo();

        assert!(!repo.exists_by_code("P001").unwrap());
        repo.save(new_product("P001", false)).unwrap();
        assert!(repo.exists_by_code("P001").unwrap());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_cost_round_trips_at_two_decimals() {
        let (_temp, repo) = create_repo();

        for (code, cost) in [("P010", 50.12), ("P011", 999.99), ("P012", 0.01)] {
            let mut product = new_product(code, false);
            product.cost = cost;
            repo.save(product).unwrap();

            let found = repo.find_by_code(code).unwrap().unwrap();
            assert_eq!(found.cost, cost);
            assert_eq!(format!("{:.2}", found.cost), format!("{:.2}", cost));
        }
    }

    #[test]
    fn test_duplicate_save_is_unique_violation() {
        let (_temp, repo) = create_repo();

        repo.save(new_product("P001", false)).unwrap();
        let err = repo.save(new_product("P001", false)).unwrap_err();

        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_find_missing_returns_none() {
        let (_temp, repo) = create_repo();
        assert!(repo.find_by_code("NOPE").unwrap().is_none());
    }
}

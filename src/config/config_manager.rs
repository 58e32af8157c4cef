// ==========================================
// 商品数据导入工具 - 配置管理器
// ==========================================
// 职责: 配置查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（会初始化 schema）
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let guard = lock(&conn)?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = lock(&self.conn)?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = lock(&self.conn)?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::debug!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 获取 global scope 全部配置（按 key 排序）
    pub fn get_config_snapshot(&self) -> ImportResult<BTreeMap<String, String>> {
        let conn = lock(&self.conn)?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 读取并解析配置，不存在时返回默认值；存在但格式错误时报错
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ImportResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|e| ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw.clone(),
                message: e.to_string(),
            }),
        }
    }

    /// 金额类配置必须为有限非负数
    fn get_amount(&self, key: &str, default: f64) -> ImportResult<f64> {
        let value = self.get_parsed_or_default::<f64>(key, default)?;
        if !value.is_finite() || value < 0.0 {
            return Err(ImportError::ConfigValueError {
                key: key.to_string(),
                value: value.to_string(),
                message: "必须为非负数".to_string(),
            });
        }
        Ok(value)
    }
}

fn lock(conn: &Arc<Mutex<Connection>>) -> ImportResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_max_cost(&self) -> ImportResult<f64> {
        self.get_amount(config_keys::MAX_COST, defaults::MAX_COST)
    }

    async fn get_min_cost(&self) -> ImportResult<f64> {
        self.get_amount(config_keys::MIN_COST, defaults::MIN_COST)
    }

    async fn get_min_stock(&self) -> ImportResult<i64> {
        self.get_parsed_or_default(config_keys::MIN_STOCK, defaults::MIN_STOCK)
    }

    async fn get_legacy_code_required_message(&self) -> ImportResult<bool> {
        let key = config_keys::LEGACY_CODE_REQUIRED_MESSAGE;
        match self.get_config_value(key)? {
            None => Ok(defaults::LEGACY_CODE_REQUIRED_MESSAGE),
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(ImportError::ConfigValueError {
                    key: key.to_string(),
                    value: raw,
                    message: "必须为 true/false".to_string(),
                }),
            },
        }
    }

    async fn get_delimiter(&self) -> ImportResult<u8> {
        let key = config_keys::DELIMITER;
        let raw = match self.get_config_value(key)? {
            None => return Ok(defaults::DELIMITER),
            Some(raw) => raw,
        };

        // 制表符允许写成 \t
        if raw == "\\t" {
            return Ok(b'\t');
        }

        match raw.as_bytes() {
            [byte] if byte.is_ascii() && *byte != b'"' && *byte != b'\n' && *byte != b'\r' => {
                Ok(*byte)
            }
            _ => Err(ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw,
                message: "必须为单个 ASCII 字符（不能是引号或换行）".to_string(),
            }),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 校验阈值
    pub const MAX_COST: &str = "import.max_cost";
    pub const MIN_COST: &str = "import.min_cost";
    pub const MIN_STOCK: &str = "import.min_stock";

    // 编码为空的提示文案（历史兼容）
    pub const LEGACY_CODE_REQUIRED_MESSAGE: &str = "import.legacy_code_required_message";

    // 文件格式
    pub const DELIMITER: &str = "import.delimiter";
}

mod defaults {
    pub const MAX_COST: f64 = 1000.0;
    pub const MIN_COST: f64 = 5.0;
    pub const MIN_STOCK: i64 = 10;
    pub const LEGACY_CODE_REQUIRED_MESSAGE: bool = false;
    pub const DELIMITER: u8 = b',';
}

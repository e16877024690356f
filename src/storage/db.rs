//! 本地数据库
//!
//! 表结构：
//! - `config`：单一配置槽位，值为 JSON
//! - `translation_cache`：内容哈希 -> JSON 记录
//! - `translation_cache_by_created_at`：创建时间（毫秒）-> 内容哈希，用于按截止时间范围查询

use std::path::Path;
use std::sync::Arc;

use redb::backends::InMemoryBackend;
use redb::{Database, MultimapTableDefinition, TableDefinition};

use crate::error::FrogResult;

pub(crate) const CONFIG_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("config");

pub(crate) const CACHE_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("translation_cache");

pub(crate) const CACHE_BY_CREATED_TABLE: MultimapTableDefinition<i64, &str> =
    MultimapTableDefinition::new("translation_cache_by_created_at");

/// 本地数据库句柄，可廉价克隆
#[derive(Clone)]
pub struct LocalDb {
    db: Arc<Database>,
}

impl LocalDb {
    /// 打开（或创建）数据库文件
    pub fn open(path: impl AsRef<Path>) -> FrogResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::debug!("打开本地数据库: {}", path.display());
        let db = Database::create(path)?;
        Self::with_database(db)
    }

    /// 内存数据库，进程结束即丢弃
    pub fn in_memory() -> FrogResult<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::with_database(db)
    }

    fn with_database(db: Database) -> FrogResult<Self> {
        let local = Self { db: Arc::new(db) };
        local.ensure_tables()?;
        Ok(local)
    }

    /// 只读事务打开不存在的表会失败，启动时先建好所有表
    fn ensure_tables(&self) -> FrogResult<()> {
        let txn = self.db.begin_write()?;
        {
            txn.open_table(CONFIG_TABLE)?;
            txn.open_table(CACHE_TABLE)?;
            txn.open_multimap_table(CACHE_BY_CREATED_TABLE)?;
        }
        txn.commit()?;
        Ok(())
    }

    pub(crate) fn database(&self) -> &Database {
        &self.db
    }
}

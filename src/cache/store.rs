//! 翻译缓存存储
//!
//! 清理与统计只依赖 [`TranslationCacheStore`] 的三个谓词操作；
//! [`RedbCacheStore`] 是基于本地数据库的实现，每次调用对应一个事务。

use chrono::{DateTime, Utc};
use redb::{ReadableMultimapTable, ReadableTable, ReadableTableMetadata};
use serde::{Deserialize, Serialize};

use super::key::CacheKey;
use crate::error::FrogResult;
use crate::storage::db::{CACHE_BY_CREATED_TABLE, CACHE_TABLE};
use crate::storage::LocalDb;

/// 缓存记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    pub translation: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl CacheRecord {
    pub fn new(translation: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            translation: translation.into(),
            created_at,
        }
    }
}

/// 同一时刻的条目数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounts {
    pub total: usize,
    pub created_before: usize,
}

/// 翻译缓存存储接口
pub trait TranslationCacheStore: Send + Sync {
    /// 按键读取
    fn get(&self, key: &CacheKey) -> FrogResult<Option<CacheRecord>>;

    /// 写入；已有的同键记录被覆盖
    fn put(&self, key: &CacheKey, record: &CacheRecord) -> FrogResult<()>;

    /// 删除 `created_at < cutoff` 的记录，返回删除数量
    fn delete_created_before(&self, cutoff: DateTime<Utc>) -> FrogResult<usize>;

    /// 统计 `created_at < cutoff` 的记录数
    fn count_created_before(&self, cutoff: DateTime<Utc>) -> FrogResult<usize>;

    /// 记录总数
    fn count_all(&self) -> FrogResult<usize>;

    /// 同时读取总数与早于 `cutoff` 的记录数
    ///
    /// 默认实现分两次读取；支持快照的存储应在同一个读事务内完成。
    fn counts(&self, cutoff: DateTime<Utc>) -> FrogResult<CacheCounts> {
        Ok(CacheCounts {
            total: self.count_all()?,
            created_before: self.count_created_before(cutoff)?,
        })
    }
}

/// 基于 redb 的缓存存储
#[derive(Clone)]
pub struct RedbCacheStore {
    db: LocalDb,
}

impl RedbCacheStore {
    pub fn new(db: LocalDb) -> Self {
        Self { db }
    }
}

/// 收集创建时间早于 `cutoff_ms` 的 (创建时间, 键)
fn collect_created_before<T>(index: &T, cutoff_ms: i64) -> FrogResult<Vec<(i64, String)>>
where
    T: ReadableMultimapTable<i64, &'static str>,
{
    let mut found = Vec::new();
    for item in index.range(..cutoff_ms)? {
        let (created_at, keys) = item?;
        let created_at = created_at.value();
        for key in keys {
            found.push((created_at, key?.value().to_string()));
        }
    }
    Ok(found)
}

fn count_created_before_in<T>(index: &T, cutoff_ms: i64) -> FrogResult<usize>
where
    T: ReadableMultimapTable<i64, &'static str>,
{
    let mut count = 0;
    for item in index.range(..cutoff_ms)? {
        let (_, keys) = item?;
        count += keys.len() as usize;
    }
    Ok(count)
}

impl TranslationCacheStore for RedbCacheStore {
    fn get(&self, key: &CacheKey) -> FrogResult<Option<CacheRecord>> {
        let txn = self.db.database().begin_read()?;
        let entries = txn.open_table(CACHE_TABLE)?;

        match entries.get(key.as_str())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes.value())?)),
            None => Ok(None),
        }
    }

    fn put(&self, key: &CacheKey, record: &CacheRecord) -> FrogResult<()> {
        let bytes = serde_json::to_vec(record)?;

        let txn = self.db.database().begin_write()?;
        {
            let mut entries = txn.open_table(CACHE_TABLE)?;
            let mut index = txn.open_multimap_table(CACHE_BY_CREATED_TABLE)?;

            let previous = entries
                .insert(key.as_str(), bytes.as_slice())?
                .map(|old| serde_json::from_slice::<CacheRecord>(old.value()))
                .transpose()?;

            if let Some(previous) = previous {
                index.remove(previous.created_at.timestamp_millis(), key.as_str())?;
            }
            index.insert(record.created_at.timestamp_millis(), key.as_str())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn delete_created_before(&self, cutoff: DateTime<Utc>) -> FrogResult<usize> {
        let txn = self.db.database().begin_write()?;
        let deleted = {
            let mut entries = txn.open_table(CACHE_TABLE)?;
            let mut index = txn.open_multimap_table(CACHE_BY_CREATED_TABLE)?;

            let expired = collect_created_before(&index, cutoff.timestamp_millis())?;
            for (created_at, key) in &expired {
                entries.remove(key.as_str())?;
                index.remove(*created_at, key.as_str())?;
            }
            expired.len()
        };
        txn.commit()?;
        Ok(deleted)
    }

    fn count_created_before(&self, cutoff: DateTime<Utc>) -> FrogResult<usize> {
        let txn = self.db.database().begin_read()?;
        let index = txn.open_multimap_table(CACHE_BY_CREATED_TABLE)?;
        count_created_before_in(&index, cutoff.timestamp_millis())
    }

    fn count_all(&self) -> FrogResult<usize> {
        let txn = self.db.database().begin_read()?;
        let entries = txn.open_table(CACHE_TABLE)?;
        Ok(entries.len()? as usize)
    }

    fn counts(&self, cutoff: DateTime<Utc>) -> FrogResult<CacheCounts> {
        let txn = self.db.database().begin_read()?;
        let entries = txn.open_table(CACHE_TABLE)?;
        let index = txn.open_multimap_table(CACHE_BY_CREATED_TABLE)?;

        Ok(CacheCounts {
            total: entries.len()? as usize,
            created_before: count_created_before_in(&index, cutoff.timestamp_millis())?,
        })
    }
}

// 集成测试公共模块
//
// 提供测试辅助工具和共享功能

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;

use read_frog::cache::{CacheKey, CacheRecord, RedbCacheStore, TranslationCacheStore};
use read_frog::error::{helpers::store_error, FrogResult};
use read_frog::storage::LocalDb;

/// 测试使用的固定时间
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

/// 基于临时目录的测试环境
pub struct TestEnvironment {
    pub dir: TempDir,
    pub db: LocalDb,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let db = LocalDb::open(Self::db_path_in(&dir)).expect("open local db");
        Self { dir, db }
    }

    fn db_path_in(dir: &TempDir) -> std::path::PathBuf {
        dir.path().join("read-frog.redb")
    }

    pub fn db_path(&self) -> std::path::PathBuf {
        Self::db_path_in(&self.dir)
    }

    pub fn cache_store(&self) -> RedbCacheStore {
        RedbCacheStore::new(self.db.clone())
    }
}

/// 测试数据生成器
pub struct TestDataGenerator;

impl TestDataGenerator {
    /// 按年龄写入缓存条目，返回对应的键
    pub fn seed_ages<S: TranslationCacheStore + ?Sized>(
        store: &S,
        now: DateTime<Utc>,
        ages: &[Duration],
    ) -> Vec<CacheKey> {
        ages.iter()
            .enumerate()
            .map(|(i, age)| {
                let key = CacheKey::for_pure_provider(&format!("text {i}"), "google", "auto", "zh");
                store
                    .put(&key, &CacheRecord::new(format!("译文 {i}"), now - *age))
                    .expect("seed cache entry");
                key
            })
            .collect()
    }

    /// 带有已废弃提供商的 v009 配置
    pub fn v009_config() -> Value {
        json!({
            "language": {"sourceCode": "auto", "targetCode": "cmn"},
            "providersConfig": {
                "openai": {"apiKey": "sk-test", "baseURL": "https://api.openai.com/v1"},
                "deepseek": {"apiKey": null},
                "openrouter": {"apiKey": "sk-or"},
                "ollama": {"baseURL": "http://127.0.0.1:11434/v1"}
            },
            "read": {
                "provider": "openai",
                "models": {
                    "openai": {"model": "gpt-4o-mini", "isCustomModel": false, "customModel": ""},
                    "ollama": {"model": "llama3", "isCustomModel": true, "customModel": "qwen"}
                }
            },
            "translate": {
                "provider": "microsoft",
                "models": {
                    "microsoft": null,
                    "openrouter": {"model": "x", "isCustomModel": false, "customModel": ""},
                    "ollama": false
                },
                "requestQueueConfig": {"capacity": 300, "rate": 5}
            },
            "floatingButton": {"enabled": true, "position": 0.66}
        })
    }
}

/// 可以切换为失败状态的存储
pub struct FlakyStore {
    inner: RedbCacheStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: RedbCacheStore::new(LocalDb::in_memory().expect("in-memory db")),
            failing: AtomicBool::new(false),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> FrogResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(store_error("simulated outage"))
        } else {
            Ok(())
        }
    }
}

impl TranslationCacheStore for FlakyStore {
    fn get(&self, key: &CacheKey) -> FrogResult<Option<CacheRecord>> {
        self.check()?;
        self.inner.get(key)
    }

    fn put(&self, key: &CacheKey, record: &CacheRecord) -> FrogResult<()> {
        self.check()?;
        self.inner.put(key, record)
    }

    fn delete_created_before(&self, cutoff: DateTime<Utc>) -> FrogResult<usize> {
        self.check()?;
        self.inner.delete_created_before(cutoff)
    }

    fn count_created_before(&self, cutoff: DateTime<Utc>) -> FrogResult<usize> {
        self.check()?;
        self.inner.count_created_before(cutoff)
    }

    fn count_all(&self) -> FrogResult<usize> {
        self.check()?;
        self.inner.count_all()
    }
}

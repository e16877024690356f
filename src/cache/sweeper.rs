//! 翻译缓存清理
//!
//! 按创建时间删除过期条目。截止时间为 `now - retention`，
//! 严格早于截止时间的条目才会被删除。

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::store::TranslationCacheStore;
use crate::error::FrogResult;

/// 默认保留天数
pub const DEFAULT_RETENTION_DAYS: i64 = 7;
/// 默认检查间隔
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
/// 启动后首次清理前的等待时间
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(60);

/// 清理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub deleted_count: usize,
    pub cutoff_date: DateTime<Utc>,
}

/// 缓存统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsReport {
    pub total_entries: usize,
    pub old_entries: usize,
    pub cleanup_threshold: DateTime<Utc>,
}

/// 清理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// 条目保留时长
    pub retention: chrono::Duration,
    /// 定时清理间隔
    pub check_interval: Duration,
    /// 首次清理延迟
    pub initial_delay: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            retention: chrono::Duration::days(DEFAULT_RETENTION_DAYS),
            check_interval: DEFAULT_CHECK_INTERVAL,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

/// 计算截止时间
pub fn cutoff(now: DateTime<Utc>, retention: chrono::Duration) -> DateTime<Utc> {
    now - retention
}

/// 删除早于 `now - retention` 的条目
///
/// 存储失败会记录日志并原样返回，不会被报告为删除了 0 条。
pub fn sweep<S>(store: &S, now: DateTime<Utc>, retention: chrono::Duration) -> FrogResult<SweepReport>
where
    S: TranslationCacheStore + ?Sized,
{
    let cutoff_date = cutoff(now, retention);

    let deleted_count = store.delete_created_before(cutoff_date).map_err(|e| {
        tracing::error!("清理翻译缓存失败: {}", e);
        e
    })?;

    if deleted_count > 0 {
        tracing::info!(
            "已清理 {} 条翻译缓存（早于 {}）",
            deleted_count,
            cutoff_date.to_rfc3339()
        );
    } else {
        tracing::debug!("没有需要清理的翻译缓存");
    }

    Ok(SweepReport {
        deleted_count,
        cutoff_date,
    })
}

/// 统计缓存条目，不修改存储
pub fn stats<S>(store: &S, now: DateTime<Utc>, retention: chrono::Duration) -> FrogResult<CacheStatsReport>
where
    S: TranslationCacheStore + ?Sized,
{
    let cleanup_threshold = cutoff(now, retention);

    let counts = store.counts(cleanup_threshold)?;

    Ok(CacheStatsReport {
        total_entries: counts.total,
        old_entries: counts.created_before,
        cleanup_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::key::CacheKey;
    use crate::cache::store::{CacheRecord, RedbCacheStore};
    use crate::storage::LocalDb;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn seeded(ages: &[chrono::Duration]) -> RedbCacheStore {
        let store = RedbCacheStore::new(LocalDb::in_memory().unwrap());
        for (i, age) in ages.iter().enumerate() {
            let key = CacheKey::from_parts(&[&i.to_string()]);
            store
                .put(&key, &CacheRecord::new(format!("t{i}"), now() - *age))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_default_policy() {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.retention, chrono::Duration::days(7));
        assert_eq!(policy.check_interval, Duration::from_secs(86_400));
        assert_eq!(policy.initial_delay, Duration::from_secs(60));
    }

    #[test]
    fn test_sweep_reports_cutoff() {
        let store = seeded(&[chrono::Duration::days(8), chrono::Duration::days(1)]);

        let report = sweep(&store, now(), chrono::Duration::days(7)).unwrap();

        assert_eq!(report.deleted_count, 1);
        assert_eq!(report.cutoff_date, now() - chrono::Duration::days(7));
        assert_eq!(store.count_all().unwrap(), 1);
    }

    #[test]
    fn test_sweep_on_empty_store() {
        let store = seeded(&[]);
        let report = sweep(&store, now(), chrono::Duration::days(7)).unwrap();
        assert_eq!(report.deleted_count, 0);
    }

    #[test]
    fn test_stats_counts_without_deleting() {
        let store = seeded(&[chrono::Duration::days(30), chrono::Duration::hours(1)]);

        let report = stats(&store, now(), chrono::Duration::days(7)).unwrap();

        assert_eq!(report.total_entries, 2);
        assert_eq!(report.old_entries, 1);
        assert_eq!(report.cleanup_threshold, now() - chrono::Duration::days(7));
        assert_eq!(store.count_all().unwrap(), 2);
    }

    #[test]
    fn test_report_wire_names() {
        let report = SweepReport {
            deleted_count: 3,
            cutoff_date: now(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["deletedCount"], 3);
        assert!(json["cutoffDate"].as_str().unwrap().starts_with("2025-06-15T12:00:00"));
    }
}

//! 缓存清理集成测试
//!
//! 测试按保留期清理、统计以及定时维护任务

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;

use read_frog::cache::{self, CacheMaintenance, RetentionPolicy, TranslationCacheStore};

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{fixed_now, TestDataGenerator, TestEnvironment};

fn week() -> Duration {
    Duration::days(7)
}

/// 固定时间下第二次清理不再删除任何条目
#[test]
fn test_sweep_is_idempotent() {
    let env = TestEnvironment::new();
    let store = env.cache_store();
    TestDataGenerator::seed_ages(&store, fixed_now(), &[Duration::days(30), Duration::days(8), Duration::hours(2)]);

    let first = cache::sweep(&store, fixed_now(), week()).unwrap();
    let second = cache::sweep(&store, fixed_now(), week()).unwrap();

    assert_eq!(first.deleted_count, 2);
    assert_eq!(second.deleted_count, 0);
    assert_eq!(first.cutoff_date, second.cutoff_date);
}

/// 截止时间上的条目保留，早一毫秒的条目删除
#[test]
fn test_sweep_boundary_is_strict() {
    let env = TestEnvironment::new();
    let store = env.cache_store();
    let keys = TestDataGenerator::seed_ages(
        &store,
        fixed_now(),
        &[week(), week() + Duration::milliseconds(1)],
    );

    let report = cache::sweep(&store, fixed_now(), week()).unwrap();

    assert_eq!(report.deleted_count, 1);
    assert!(store.get(&keys[0]).unwrap().is_some());
    assert!(store.get(&keys[1]).unwrap().is_none());
}

/// 统计不会删除条目
#[test]
fn test_stats_is_pure() {
    let env = TestEnvironment::new();
    let store = env.cache_store();
    TestDataGenerator::seed_ages(&store, fixed_now(), &[Duration::days(9), Duration::days(1)]);

    let first = cache::stats(&store, fixed_now(), week()).unwrap();
    let second = cache::stats(&store, fixed_now(), week()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.total_entries, 2);
    assert_eq!(first.old_entries, 1);
}

/// 10 天、6 天、1 天三个条目，保留 7 天
#[test]
fn test_end_to_end_retention_scenario() {
    let env = TestEnvironment::new();
    let store = env.cache_store();
    TestDataGenerator::seed_ages(
        &store,
        fixed_now(),
        &[Duration::days(10), Duration::days(6), Duration::days(1)],
    );

    let report = cache::sweep(&store, fixed_now(), week()).unwrap();
    assert_eq!(report.deleted_count, 1);
    assert_eq!(store.count_all().unwrap(), 2);

    let stats = cache::stats(&store, fixed_now(), week()).unwrap();
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.old_entries, 0);
    assert_eq!(stats.cleanup_threshold, fixed_now() - week());

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["totalEntries"], 2);
    assert_eq!(json["oldEntries"], 0);
}

/// 清理结果在重新打开数据库后依然生效
#[test]
fn test_sweep_persists_across_reopen() {
    let env = TestEnvironment::new();
    TestDataGenerator::seed_ages(&env.cache_store(), fixed_now(), &[Duration::days(10), Duration::days(1)]);
    cache::sweep(&env.cache_store(), fixed_now(), week()).unwrap();

    let path = env.db_path();
    let TestEnvironment { dir, db } = env;
    drop(db);

    let reopened = read_frog::storage::LocalDb::open(&path).unwrap();
    let store = read_frog::cache::RedbCacheStore::new(reopened);
    assert_eq!(store.count_all().unwrap(), 1);
    drop(dir);
}

/// 维护任务按需清理与统计
#[tokio::test]
async fn test_maintenance_handle_round_trip() {
    let env = TestEnvironment::new();
    let store = Arc::new(env.cache_store());
    TestDataGenerator::seed_ages(
        store.as_ref(),
        fixed_now(),
        &[Duration::days(10), Duration::days(6), Duration::days(1)],
    );

    let policy = RetentionPolicy {
        initial_delay: StdDuration::from_secs(3600),
        ..RetentionPolicy::default()
    };
    let (handle, task) = CacheMaintenance::new(store.clone(), policy)
        .with_clock(fixed_now)
        .spawn();

    assert_eq!(handle.cleanup().await.unwrap().deleted_count, 1);

    let stats = handle.stats().await.unwrap();
    assert_eq!((stats.total_entries, stats.old_entries), (2, 0));

    handle.shutdown().await;
    task.await.unwrap();
}

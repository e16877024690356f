//! 缓存定时维护
//!
//! 启动后等待 `initial_delay` 执行首次清理，之后每隔 `check_interval` 清理一次。
//! 运行期间可以通过 [`MaintenanceHandle`] 按需触发清理或读取统计。
//! 定时清理的失败只记录日志，按需请求的失败返回给请求方。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::store::TranslationCacheStore;
use super::sweeper::{self, CacheStatsReport, RetentionPolicy, SweepReport};
use crate::error::{FrogError, FrogResult};

/// 当前时间的来源
pub type Clock = fn() -> DateTime<Utc>;

const REQUEST_QUEUE_SIZE: usize = 16;

// interval_at 不接受零周期
const MIN_CHECK_INTERVAL: Duration = Duration::from_millis(1);

// 超过一年的延迟与周期按一年处理，避免 Instant 加法溢出
const MAX_TIMER_DURATION: Duration = Duration::from_secs(365 * 24 * 3600);

enum Request {
    Cleanup(oneshot::Sender<FrogResult<SweepReport>>),
    Stats(oneshot::Sender<FrogResult<CacheStatsReport>>),
    Shutdown,
}

/// 缓存维护任务
#[derive(Clone)]
pub struct CacheMaintenance {
    store: Arc<dyn TranslationCacheStore>,
    policy: RetentionPolicy,
    clock: Clock,
}

impl CacheMaintenance {
    pub fn new(store: Arc<dyn TranslationCacheStore>, policy: RetentionPolicy) -> Self {
        Self {
            store,
            policy,
            clock: Utc::now,
        }
    }

    /// 替换时间来源
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// 立即清理一次
    pub async fn cleanup_now(&self) -> FrogResult<SweepReport> {
        let store = Arc::clone(&self.store);
        let now = (self.clock)();
        let retention = self.policy.retention;

        tokio::task::spawn_blocking(move || sweeper::sweep(store.as_ref(), now, retention)).await?
    }

    /// 立即读取统计
    pub async fn stats_now(&self) -> FrogResult<CacheStatsReport> {
        let store = Arc::clone(&self.store);
        let now = (self.clock)();
        let retention = self.policy.retention;

        tokio::task::spawn_blocking(move || sweeper::stats(store.as_ref(), now, retention)).await?
    }

    /// 在当前运行时上启动维护任务
    pub fn spawn(self) -> (MaintenanceHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE_SIZE);
        let task = tokio::spawn(self.run(rx));
        (MaintenanceHandle { tx }, task)
    }

    async fn run(self, mut requests: mpsc::Receiver<Request>) {
        let period = self
            .policy
            .check_interval
            .clamp(MIN_CHECK_INTERVAL, MAX_TIMER_DURATION);
        let initial_delay = self.policy.initial_delay.min(MAX_TIMER_DURATION);
        let mut ticker = interval_at(Instant::now() + initial_delay, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "缓存维护任务已启动：保留 {} 天，首次清理延迟 {:?}，间隔 {:?}",
            self.policy.retention.num_days(),
            initial_delay,
            period
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.cleanup_now().await {
                        tracing::warn!("定时清理未完成，将在下个周期重试: {}", e);
                    }
                }
                request = requests.recv() => match request {
                    Some(Request::Cleanup(reply)) => {
                        let _ = reply.send(self.cleanup_now().await);
                    }
                    Some(Request::Stats(reply)) => {
                        let _ = reply.send(self.stats_now().await);
                    }
                    Some(Request::Shutdown) | None => break,
                },
            }
        }

        tracing::info!("缓存维护任务已停止");
    }
}

/// 维护任务的请求句柄
#[derive(Clone)]
pub struct MaintenanceHandle {
    tx: mpsc::Sender<Request>,
}

impl MaintenanceHandle {
    /// 按需清理
    pub async fn cleanup(&self) -> FrogResult<SweepReport> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Cleanup(reply))
            .await
            .map_err(|_| stopped())?;
        rx.await.map_err(|_| stopped())?
    }

    /// 按需统计
    pub async fn stats(&self) -> FrogResult<CacheStatsReport> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Stats(reply))
            .await
            .map_err(|_| stopped())?;
        rx.await.map_err(|_| stopped())?
    }

    /// 请求停止；任务已停止时无操作
    pub async fn shutdown(&self) {
        let _ = self.tx.send(Request::Shutdown).await;
    }
}

fn stopped() -> FrogError {
    FrogError::InternalError("缓存维护任务已停止".to_string())
}

//! 翻译缓存
//!
//! - **key**: 内容派生的缓存键
//! - **store**: 存储接口与本地数据库实现
//! - **prompt**: 大模型翻译提示词
//! - **lookup**: 带缓存的翻译与译文整理
//! - **sweeper**: 按保留期清理与统计
//! - **scheduler**: 定时维护任务

pub mod key;
pub mod lookup;
pub mod prompt;
pub mod scheduler;
pub mod store;
pub mod sweeper;

pub use key::CacheKey;
pub use lookup::{clean_source_text, finalize_translation, get_or_translate, strip_reasoning};
pub use prompt::{render_prompt, translate_prompt};
pub use scheduler::{CacheMaintenance, Clock, MaintenanceHandle};
pub use store::{CacheCounts, CacheRecord, RedbCacheStore, TranslationCacheStore};
pub use sweeper::{cutoff, stats, sweep, CacheStatsReport, RetentionPolicy, SweepReport};

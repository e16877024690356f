//! # Read Frog 维护核心
//!
//! 浏览器翻译扩展在本地运行的两项后台维护：
//!
//! - 用户配置的版本迁移：启动时把旧版本配置逐步升级到当前版本
//! - 翻译缓存的定期清理：删除超过保留期的缓存条目
//!
//! ## 模块组织
//!
//! - `config` - 配置模式、迁移链与持久化
//! - `cache` - 翻译缓存、清理与定时维护
//! - `storage` - 本地数据库
//! - `settings` - 维护任务设置
//! - `env` - 类型安全的环境变量
//! - `error` - 统一错误类型
//! - `logging` - 日志初始化

pub mod cache;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod settings;
pub mod storage;

pub use error::{FrogError, FrogResult, MigrationError};

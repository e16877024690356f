//! 用户配置
//!
//! - **version**: 配置模式版本号
//! - **blob**: 无类型配置对象的辅助函数
//! - **migration**: 版本迁移链与运行器
//! - **schema**: 当前版本的类型化配置与默认值
//! - **persist**: 本地数据库中的配置槽位与启动流程

pub mod blob;
pub mod migration;
pub mod persist;
pub mod schema;
pub mod version;

pub use blob::ConfigBlob;
pub use migration::{MigrationOutcome, MigrationRegistry, MigrationStep};
pub use persist::{ConfigStore, LoadSource, LoadedConfig, PersistedConfig, UnknownVersionPolicy};
pub use schema::{default_config_blob, Config, TranslationNodeStyle};
pub use version::SchemaVersion;

/// 配置槽位在本地数据库中的键
pub const CONFIG_STORAGE_KEY: &str = "config";

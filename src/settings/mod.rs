//! 维护任务设置
//!
//! 按以下顺序合并：默认值、设置文件、`.env` 文件与环境变量，最后统一校验。

pub mod manager;

pub use manager::{MaintenanceSettings, SettingsManager};

/// 设置常量
pub mod constants {
    use crate::cache::sweeper;

    pub const DEFAULT_RETENTION_DAYS: u32 = sweeper::DEFAULT_RETENTION_DAYS as u32;
    pub const DEFAULT_CHECK_INTERVAL_HOURS: u64 = sweeper::DEFAULT_CHECK_INTERVAL.as_secs() / 3600;
    pub const DEFAULT_INITIAL_DELAY_SECS: u64 = sweeper::DEFAULT_INITIAL_DELAY.as_secs();

    pub const MAX_RETENTION_DAYS: u32 = 3650;
    pub const MAX_CHECK_INTERVAL_HOURS: u64 = 24 * 30;
    pub const MAX_INITIAL_DELAY_SECS: u64 = 86400;

    /// `.env` 文件搜索顺序，只加载找到的第一个
    pub const ENV_FILES: &[&str] = &[".env.local", ".env"];

    // 设置文件搜索路径
    pub const SETTINGS_PATHS: &[&str] = &[
        "read-frog.toml",
        ".read-frog.toml",
        "read-frog.json",
        "~/.config/read-frog/settings.toml",
        "/etc/read-frog/settings.toml",
    ];
}

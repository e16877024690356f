//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问。所有变量都以 `READ_FROG_` 为前缀，
//! `NO_COLOR` 遵循通用约定。

use std::env;
use std::fmt;
use std::time::Duration;

use crate::config::UnknownVersionPolicy;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 变量是否被显式设置
    fn is_set() -> bool {
        env::var_os(Self::NAME).is_some()
    }

}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "READ_FROG_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid log level '{}'. Use: trace, debug, info, warn, error", value),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 用户配置相关环境变量
pub mod config {
    use super::*;

    /// 配置版本无法迁移时的处理方式
    pub struct OnUnknownVersion;
    impl EnvVar<UnknownVersionPolicy> for OnUnknownVersion {
        const NAME: &'static str = "READ_FROG_CONFIG_ON_UNKNOWN_VERSION";
        const DEFAULT: Option<UnknownVersionPolicy> = Some(UnknownVersionPolicy::Abort);
        const DESCRIPTION: &'static str =
            "What to do when the stored config cannot be migrated: abort, reset";

        fn parse(value: &str) -> EnvResult<UnknownVersionPolicy> {
            match value.trim().to_lowercase().as_str() {
                "abort" => Ok(UnknownVersionPolicy::Abort),
                "reset" | "reset-to-default" => Ok(UnknownVersionPolicy::ResetToDefault),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid policy '{}'. Use: abort, reset", value),
                }),
            }
        }
    }
}

/// 翻译缓存相关环境变量
pub mod cache {
    use super::*;
    use crate::settings::constants;

    /// 缓存保留天数
    pub struct RetentionDays;
    impl EnvVar<u32> for RetentionDays {
        const NAME: &'static str = "READ_FROG_CACHE_RETENTION_DAYS";
        const DEFAULT: Option<u32> = Some(7);
        const DESCRIPTION: &'static str = "Days a translation cache entry is kept before cleanup";

        fn parse(value: &str) -> EnvResult<u32> {
            parse_ranged_u64(value, Self::NAME, 1, u64::from(constants::MAX_RETENTION_DAYS))
                .map(|days| days as u32)
        }
    }

    /// 清理检查间隔
    pub struct CheckIntervalHours;
    impl EnvVar<Duration> for CheckIntervalHours {
        const NAME: &'static str = "READ_FROG_CACHE_CHECK_INTERVAL_HOURS";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(24 * 3600));
        const DESCRIPTION: &'static str = "Hours between scheduled cache cleanups";

        fn parse(value: &str) -> EnvResult<Duration> {
            let hours = parse_ranged_u64(value, Self::NAME, 1, constants::MAX_CHECK_INTERVAL_HOURS)?;
            Ok(Duration::from_secs(hours * 3600))
        }
    }

    /// 首次清理延迟
    pub struct InitialDelaySecs;
    impl EnvVar<Duration> for InitialDelaySecs {
        const NAME: &'static str = "READ_FROG_CACHE_INITIAL_DELAY_SECS";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(60));
        const DESCRIPTION: &'static str = "Seconds to wait after startup before the first cleanup";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds = parse_ranged_u64(value, Self::NAME, 0, constants::MAX_INITIAL_DELAY_SECS)?;
            Ok(Duration::from_secs(seconds))
        }
    }
}

/// 本地存储相关环境变量
pub mod storage {
    use super::*;

    /// 默认数据库路径
    pub const DEFAULT_DB_PATH: &str = "~/.local/share/read-frog/read-frog.redb";

    /// 数据库文件路径
    pub struct DbPath;
    impl EnvVar<String> for DbPath {
        const NAME: &'static str = "READ_FROG_DB_PATH";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(shellexpand::tilde(DEFAULT_DB_PATH).into_owned()),
            }
        }
        const DESCRIPTION: &'static str = "Path of the local database holding config and translation cache";

        fn parse(value: &str) -> EnvResult<String> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Path cannot be empty".to_string(),
                });
            }
            Ok(shellexpand::tilde(trimmed).into_owned())
        }
    }

    /// 维护设置文件路径
    pub struct SettingsPath;
    impl EnvVar<String> for SettingsPath {
        const NAME: &'static str = "READ_FROG_SETTINGS";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Explicit maintenance settings file (TOML or JSON)";

        fn parse(value: &str) -> EnvResult<String> {
            let path = shellexpand::tilde(value.trim()).into_owned();
            if !(path.ends_with(".toml") || path.ends_with(".json")) {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Settings file must end with .toml or .json".to_string(),
                });
            }
            Ok(path)
        }
    }
}

/// 辅助函数
fn parse_ranged_u64(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<u64> {
    let num: u64 = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid non-negative number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    // 核心配置
    pub log_level: String,
    pub no_color: bool,

    // 用户配置
    pub on_unknown_version: UnknownVersionPolicy,

    // 缓存配置
    pub cache_retention_days: u32,
    pub cache_check_interval: Duration,
    pub cache_initial_delay: Duration,

    // 存储配置
    pub db_path: String,
    pub settings_path: Option<String>,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: core::LogLevel::get()?,
            no_color: core::NoColor::get()?,

            on_unknown_version: config::OnUnknownVersion::get()?,

            cache_retention_days: cache::RetentionDays::get()?,
            cache_check_interval: cache::CheckIntervalHours::get()?,
            cache_initial_delay: cache::InitialDelaySecs::get()?,

            db_path: storage::DbPath::get()?,
            settings_path: if storage::SettingsPath::is_set() {
                Some(storage::SettingsPath::get()?)
            } else {
                None
            },
        })
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("Environment Configuration Summary:");
        println!("  Log Level: {}", self.log_level);
        println!("  Unknown config version: {:?}", self.on_unknown_version);
        println!("  Cache retention: {} days", self.cache_retention_days);
        println!("  Cache check interval: {:?}", self.cache_check_interval);
        println!("  Database: {}", self.db_path);
        if let Some(path) = &self.settings_path {
            println!("  Settings file: {}", path);
        }
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    fn line<T: fmt::Debug>(name: &str, description: &str, default: Option<T>) -> String {
        format!("- `{}`: {} (default: {:?})\n", name, description, default)
    }

    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&line(core::LogLevel::NAME, core::LogLevel::DESCRIPTION, Some("info")));
    docs.push_str(&line(core::NoColor::NAME, core::NoColor::DESCRIPTION, core::NoColor::DEFAULT));

    docs.push_str("\n## User Config\n\n");
    docs.push_str(&line(
        config::OnUnknownVersion::NAME,
        config::OnUnknownVersion::DESCRIPTION,
        config::OnUnknownVersion::DEFAULT,
    ));

    docs.push_str("\n## Translation Cache\n\n");
    docs.push_str(&line(
        cache::RetentionDays::NAME,
        cache::RetentionDays::DESCRIPTION,
        cache::RetentionDays::DEFAULT,
    ));
    docs.push_str(&line(
        cache::CheckIntervalHours::NAME,
        cache::CheckIntervalHours::DESCRIPTION,
        cache::CheckIntervalHours::DEFAULT,
    ));
    docs.push_str(&line(
        cache::InitialDelaySecs::NAME,
        cache::InitialDelaySecs::DESCRIPTION,
        cache::InitialDelaySecs::DEFAULT,
    ));

    docs.push_str("\n## Storage\n\n");
    docs.push_str(&line(storage::DbPath::NAME, storage::DbPath::DESCRIPTION, Some(storage::DEFAULT_DB_PATH)));
    docs.push_str(&line(
        storage::SettingsPath::NAME,
        storage::SettingsPath::DESCRIPTION,
        storage::SettingsPath::DEFAULT,
    ));

    docs
}

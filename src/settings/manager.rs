//! 维护设置管理器
//!
//! 提供统一的设置接口，支持设置文件、环境变量和默认值

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::cache::RetentionPolicy;
use crate::config::UnknownVersionPolicy;
use crate::env::{self, EnvVar};
use crate::error::{FrogError, FrogResult};

/// 维护任务设置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MaintenanceSettings {
    // 缓存清理
    pub retention_days: u32,
    pub check_interval_hours: u64,
    pub initial_delay_secs: u64,

    // 存储
    pub db_path: String,

    // 用户配置
    pub on_unknown_version: UnknownVersionPolicy,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            retention_days: constants::DEFAULT_RETENTION_DAYS,
            check_interval_hours: constants::DEFAULT_CHECK_INTERVAL_HOURS,
            initial_delay_secs: constants::DEFAULT_INITIAL_DELAY_SECS,
            db_path: env::storage::DEFAULT_DB_PATH.to_string(),
            on_unknown_version: UnknownVersionPolicy::Abort,
        }
    }
}

impl MaintenanceSettings {
    /// 验证设置
    pub fn validate(&self) -> FrogResult<()> {
        if self.retention_days == 0 {
            return Err(FrogError::ConfigError("缓存保留天数不能为0".to_string()));
        }

        if self.retention_days > constants::MAX_RETENTION_DAYS {
            return Err(FrogError::ConfigError(format!(
                "缓存保留天数不能超过 {}",
                constants::MAX_RETENTION_DAYS
            )));
        }

        if self.check_interval_hours == 0 {
            return Err(FrogError::ConfigError("清理检查间隔不能为0".to_string()));
        }

        if self.check_interval_hours > constants::MAX_CHECK_INTERVAL_HOURS {
            return Err(FrogError::ConfigError(format!(
                "清理检查间隔不能超过 {} 小时",
                constants::MAX_CHECK_INTERVAL_HOURS
            )));
        }

        if self.initial_delay_secs > constants::MAX_INITIAL_DELAY_SECS {
            return Err(FrogError::ConfigError(format!(
                "首次清理延迟不能超过 {} 秒",
                constants::MAX_INITIAL_DELAY_SECS
            )));
        }

        if self.db_path.trim().is_empty() {
            return Err(FrogError::ConfigError("数据库路径不能为空".to_string()));
        }

        Ok(())
    }

    /// 应用环境变量覆盖；只处理显式设置的变量
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{cache, config, storage};

        if let Some(days) = env_override::<_, cache::RetentionDays>() {
            self.retention_days = days;
        }

        if let Some(interval) = env_override::<_, cache::CheckIntervalHours>() {
            self.check_interval_hours = interval.as_secs() / 3600;
        }

        if let Some(delay) = env_override::<_, cache::InitialDelaySecs>() {
            self.initial_delay_secs = delay.as_secs();
        }

        if let Some(path) = env_override::<_, storage::DbPath>() {
            tracing::info!("环境变量覆盖数据库路径: {}", path);
            self.db_path = path;
        }

        if let Some(policy) = env_override::<_, config::OnUnknownVersion>() {
            self.on_unknown_version = policy;
        }
    }

    /// 转换为清理策略
    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy {
            retention: chrono::Duration::days(i64::from(self.retention_days)),
            check_interval: Duration::from_secs(self.check_interval_hours.saturating_mul(3600)),
            initial_delay: Duration::from_secs(self.initial_delay_secs),
        }
    }

    /// 展开 `~` 后的数据库路径
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.db_path).as_ref())
    }
}

fn env_override<T, V: EnvVar<T>>() -> Option<T> {
    if !V::is_set() {
        return None;
    }
    match V::get() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("忽略无效的环境变量: {}", e);
            None
        }
    }
}

/// 设置管理器
pub struct SettingsManager {
    settings: MaintenanceSettings,
}

impl SettingsManager {
    /// 从默认位置加载设置
    pub fn new() -> FrogResult<Self> {
        Self::with_file(None)
    }

    /// 优先使用显式指定的设置文件
    pub fn with_file(path: Option<&str>) -> FrogResult<Self> {
        let mut settings = Self::load_config(path)?;
        settings.apply_env_overrides();
        settings.validate()?;

        Ok(Self { settings })
    }

    /// 获取设置
    pub fn settings(&self) -> &MaintenanceSettings {
        &self.settings
    }

    pub fn into_settings(self) -> MaintenanceSettings {
        self.settings
    }

    fn load_config(explicit: Option<&str>) -> FrogResult<MaintenanceSettings> {
        // 首先尝试加载 .env 文件
        Self::load_dotenv();

        let explicit = match explicit {
            Some(path) => Some(shellexpand::tilde(path).into_owned()),
            None if env::storage::SettingsPath::is_set() => Some(
                env::storage::SettingsPath::get().map_err(|e| FrogError::ConfigError(e.to_string()))?,
            ),
            None => None,
        };

        if let Some(path) = explicit {
            tracing::info!("加载设置文件: {}", path);
            return Self::load_from_file(&path);
        }

        for path in constants::SETTINGS_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载设置文件: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::debug!("未找到设置文件，使用默认设置");
        Ok(MaintenanceSettings::default())
    }

    /// 从指定文件加载设置
    pub fn load_from_file(path: &str) -> FrogResult<MaintenanceSettings> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FrogError::ConfigError(format!("读取设置文件失败: {}", e)))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .map_err(|e| FrogError::ConfigError(format!("解析JSON设置失败: {}", e)))
        } else {
            toml::from_str(&content)
                .map_err(|e| FrogError::ConfigError(format!("解析TOML设置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        for env_file in constants::ENV_FILES {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例设置文件
    pub fn generate_example_config(path: &str) -> FrogResult<()> {
        let settings = MaintenanceSettings::default();
        let content = toml::to_string_pretty(&settings)
            .map_err(|e| FrogError::ConfigError(format!("序列化设置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| FrogError::ConfigError(format!("写入设置文件失败: {}", e)))?;

        Ok(())
    }
}

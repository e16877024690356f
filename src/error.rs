//! 统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。迁移链的异常单独使用
//! [`MigrationError`]，以便调用方区分"已是最新"与"无法迁移"。

use std::fmt;

use thiserror::Error;

use crate::config::version::SchemaVersion;

/// 配置迁移错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// 版本号无法解析
    #[error("无法解析的配置版本号: {0:?}")]
    InvalidVersionTag(String),

    /// 存储的版本比当前已知的任何版本都新
    #[error("存储的配置版本 {stored} 比当前版本 {current} 更新")]
    FutureVersion {
        stored: SchemaVersion,
        current: SchemaVersion,
    },

    /// 存储的版本早于最早注册的迁移步骤
    #[error("配置版本 {stored} 没有可用的迁移路径（最早支持 {earliest}）")]
    NoMigrationPath {
        stored: SchemaVersion,
        earliest: SchemaVersion,
    },

    /// 迁移注册表不连续或存在重复
    #[error("迁移链断裂: 期望从 {expected} 开始的步骤，实际为 {found}")]
    BrokenChain {
        expected: SchemaVersion,
        found: SchemaVersion,
    },

    /// 迁移步骤不是单步递增
    #[error("迁移步骤 {from} -> {to} 必须只递增一个版本")]
    InvalidStep {
        from: SchemaVersion,
        to: SchemaVersion,
    },

    /// 注册表为空
    #[error("迁移注册表为空")]
    EmptyRegistry,

    /// 顶层配置不是对象
    #[error("版本 {version} 的配置顶层必须是对象，实际为 {found}")]
    NotAnObject {
        version: SchemaVersion,
        found: &'static str,
    },

    /// 最终迁移结果不符合当前模式
    #[error("迁移后的配置不符合当前模式: {0}")]
    SchemaMismatch(String),

    /// 配置槽位内容无法解析为 `{ schemaVersion, config }`
    #[error("配置槽位已损坏: {0}")]
    CorruptSlot(String),
}

/// 核心错误类型
#[derive(Error, Debug, Clone)]
pub enum FrogError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 配置迁移错误
    #[error("配置迁移错误: {0}")]
    Migration(#[from] MigrationError),

    /// 本地存储不可用
    #[error("本地存储不可用: {0}")]
    StoreUnavailable(String),

    /// 缓存错误
    #[error("缓存错误: {0}")]
    CacheError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 解析错误
    #[error("解析错误: {0}")]
    ParseError(String),

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(String),

    /// 翻译服务错误
    #[error("翻译服务错误: {0}")]
    TranslationServiceError(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl FrogError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            FrogError::StoreUnavailable(_) => true,
            FrogError::CacheError(_) => true,
            FrogError::IoError(_) => true,
            FrogError::TranslationServiceError(_) => true,
            FrogError::ConfigError(_) => false,
            FrogError::Migration(_) => false,
            FrogError::SerializationError(_) => false,
            FrogError::ParseError(_) => false,
            FrogError::InternalError(_) => false,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FrogError::ConfigError(_) => ErrorSeverity::Critical,
            FrogError::Migration(_) => ErrorSeverity::Critical,
            FrogError::StoreUnavailable(_) => ErrorSeverity::Error,
            FrogError::CacheError(_) => ErrorSeverity::Warning,
            FrogError::SerializationError(_) => ErrorSeverity::Error,
            FrogError::ParseError(_) => ErrorSeverity::Error,
            FrogError::IoError(_) => ErrorSeverity::Warning,
            FrogError::TranslationServiceError(_) => ErrorSeverity::Warning,
            FrogError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            FrogError::ConfigError(_) => ErrorCategory::Configuration,
            FrogError::Migration(_) => ErrorCategory::Migration,
            FrogError::StoreUnavailable(_) => ErrorCategory::Storage,
            FrogError::CacheError(_) => ErrorCategory::Cache,
            FrogError::SerializationError(_) => ErrorCategory::Serialization,
            FrogError::ParseError(_) => ErrorCategory::Parsing,
            FrogError::IoError(_) => ErrorCategory::Io,
            FrogError::TranslationServiceError(_) => ErrorCategory::Service,
            FrogError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        let new_msg = |msg: &str| format!("{} (上下文: {})", msg, context);

        match &mut self {
            FrogError::ConfigError(msg)
            | FrogError::StoreUnavailable(msg)
            | FrogError::CacheError(msg)
            | FrogError::SerializationError(msg)
            | FrogError::ParseError(msg)
            | FrogError::IoError(msg)
            | FrogError::TranslationServiceError(msg)
            | FrogError::InternalError(msg) => *msg = new_msg(msg),
            // 迁移错误保持结构化，调用方需要匹配具体变体
            FrogError::Migration(_) => {}
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Migration,
    Storage,
    Cache,
    Serialization,
    Parsing,
    Io,
    Service,
    Internal,
}

/// 存储层错误统一映射为"存储不可用"
macro_rules! impl_store_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FrogError {
                fn from(error: $ty) -> Self {
                    FrogError::StoreUnavailable(error.to_string())
                }
            }
        )*
    };
}

impl_store_error!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl From<std::io::Error> for FrogError {
    fn from(error: std::io::Error) -> Self {
        FrogError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for FrogError {
    fn from(error: serde_json::Error) -> Self {
        FrogError::SerializationError(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::de::Error> for FrogError {
    fn from(error: toml::de::Error) -> Self {
        FrogError::ParseError(format!("TOML解析错误: {}", error))
    }
}

impl From<tokio::task::JoinError> for FrogError {
    fn from(error: tokio::task::JoinError) -> Self {
        FrogError::InternalError(format!("后台任务失败: {}", error))
    }
}

/// 错误结果类型别名
pub type FrogResult<T> = Result<T, FrogError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 记录并返回错误
    pub fn log_error<T>(error: FrogError) -> FrogResult<T> {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("{}", error),
            ErrorSeverity::Warning => tracing::warn!("{}", error),
            ErrorSeverity::Error => tracing::error!("{}", error),
            ErrorSeverity::Critical => tracing::error!("严重错误: {}", error),
        }

        Err(error)
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> FrogError {
        FrogError::ConfigError(msg.to_string())
    }

    /// 创建存储错误
    pub fn store_error<T: fmt::Display>(msg: T) -> FrogError {
        FrogError::StoreUnavailable(msg.to_string())
    }

    /// 创建缓存错误
    pub fn cache_error<T: fmt::Display>(msg: T) -> FrogError {
        FrogError::CacheError(msg.to_string())
    }
}

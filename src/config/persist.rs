//! 配置持久化
//!
//! 本地数据库中的单一槽位保存 `{ schemaVersion, config }`。进程启动时读取、
//! 迁移并在变化时写回。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use redb::ReadableTable;

use super::migration::{MigrationOutcome, MigrationRegistry};
use super::schema::{default_config_blob, Config};
use super::version::SchemaVersion;
use super::CONFIG_STORAGE_KEY;
use crate::error::{FrogError, FrogResult, MigrationError};
use crate::storage::db::CONFIG_TABLE;
use crate::storage::LocalDb;

/// 持久化的配置槽位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedConfig {
    /// 旧版本可能写入整数版本号，读取时统一转为字符串
    #[serde(deserialize_with = "deserialize_version_tag")]
    pub schema_version: String,
    pub config: Value,
}

impl PersistedConfig {
    pub fn new(version: SchemaVersion, config: Value) -> Self {
        Self {
            schema_version: version.to_string(),
            config,
        }
    }

    /// 解析槽位内容，失败时报告为损坏的槽位
    pub fn from_slice(bytes: &[u8]) -> Result<Self, MigrationError> {
        serde_json::from_slice(bytes).map_err(|e| MigrationError::CorruptSlot(e.to_string()))
    }

    /// 从已解析的 JSON 构造，失败时报告为损坏的槽位
    pub fn from_value(value: Value) -> Result<Self, MigrationError> {
        serde_json::from_value(value).map_err(|e| MigrationError::CorruptSlot(e.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionTag {
    Text(String),
    Number(u64),
}

fn deserialize_version_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match VersionTag::deserialize(deserializer)? {
        VersionTag::Text(tag) => tag,
        VersionTag::Number(n) => n.to_string(),
    })
}

/// 遇到无法迁移的版本时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownVersionPolicy {
    /// 返回错误，由调用方终止启动
    #[default]
    Abort,
    /// 丢弃旧配置，写入默认配置
    #[serde(alias = "reset")]
    ResetToDefault,
}

/// 启动时得到的配置
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub version: SchemaVersion,
    pub config: Config,
    pub source: LoadSource,
}

/// 配置来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// 首次安装，写入了默认配置
    FreshInstall,
    /// 已是最新版本
    UpToDate,
    /// 经过迁移并已写回
    Migrated { from: SchemaVersion },
    /// 旧配置无法迁移，已重置为默认配置
    Reset { reason: MigrationError },
}

/// 配置槽位访问器
#[derive(Clone)]
pub struct ConfigStore {
    db: LocalDb,
    registry: MigrationRegistry,
}

impl ConfigStore {
    pub fn new(db: LocalDb) -> Self {
        Self::with_registry(db, MigrationRegistry::builtin())
    }

    pub fn with_registry(db: LocalDb, registry: MigrationRegistry) -> Self {
        Self { db, registry }
    }

    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    /// 读取槽位
    ///
    /// 内容无法解析时返回 [`MigrationError::CorruptSlot`]。
    pub fn load(&self) -> FrogResult<Option<PersistedConfig>> {
        let txn = self.db.database().begin_read()?;
        let table = txn.open_table(CONFIG_TABLE)?;

        match table.get(CONFIG_STORAGE_KEY)? {
            Some(bytes) => Ok(Some(PersistedConfig::from_slice(bytes.value())?)),
            None => Ok(None),
        }
    }

    /// 写入槽位
    pub fn save(&self, persisted: &PersistedConfig) -> FrogResult<()> {
        let bytes = serde_json::to_vec(persisted)?;

        let txn = self.db.database().begin_write()?;
        {
            let mut table = txn.open_table(CONFIG_TABLE)?;
            table.insert(CONFIG_STORAGE_KEY, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// 写入当前版本的默认配置
    pub fn reset_to_default(&self) -> FrogResult<PersistedConfig> {
        let persisted = PersistedConfig::new(self.registry.current_version(), default_config_blob());
        self.save(&persisted)?;
        Ok(persisted)
    }

    /// 启动流程：读取、迁移、校验，变化时写回
    pub fn initialize(&self, policy: UnknownVersionPolicy) -> FrogResult<LoadedConfig> {
        let current = self.registry.current_version();

        let persisted = match self.load() {
            Ok(Some(persisted)) => persisted,
            Ok(None) => {
                tracing::info!("未找到已保存的配置，写入 {} 默认配置", current);
                let persisted = self.reset_to_default()?;
                return Ok(LoadedConfig {
                    version: current,
                    config: Config::from_blob(&persisted.config)?,
                    source: LoadSource::FreshInstall,
                });
            }
            Err(FrogError::Migration(reason)) => return self.recover(reason, policy),
            Err(e) => return Err(e),
        };

        match self.migrate_and_validate(&persisted) {
            Ok((outcome, config)) => {
                let source = match &outcome {
                    MigrationOutcome::UpToDate { .. } => LoadSource::UpToDate,
                    MigrationOutcome::Migrated { from, .. } => LoadSource::Migrated { from: *from },
                };
                if outcome.changed() {
                    let (version, blob) = outcome.into_parts();
                    self.save(&PersistedConfig::new(version, blob))?;
                }
                Ok(LoadedConfig {
                    version: current,
                    config,
                    source,
                })
            }
            Err(reason) => self.recover(reason, policy),
        }
    }

    /// 按策略处理无法迁移的配置
    fn recover(&self, reason: MigrationError, policy: UnknownVersionPolicy) -> FrogResult<LoadedConfig> {
        match policy {
            UnknownVersionPolicy::Abort => {
                tracing::error!("配置无法迁移（{}），保留原配置", reason);
                Err(FrogError::Migration(reason))
            }
            UnknownVersionPolicy::ResetToDefault => {
                tracing::warn!("配置无法迁移（{}），重置为默认配置", reason);
                let persisted = self.reset_to_default()?;
                Ok(LoadedConfig {
                    version: self.registry.current_version(),
                    config: Config::from_blob(&persisted.config)?,
                    source: LoadSource::Reset { reason },
                })
            }
        }
    }

    fn migrate_and_validate(
        &self,
        persisted: &PersistedConfig,
    ) -> Result<(MigrationOutcome, Config), MigrationError> {
        let outcome = self
            .registry
            .run(&persisted.schema_version, persisted.config.clone())?;
        let config = Config::from_blob(outcome.config())?;
        Ok((outcome, config))
    }
}

//! 配置迁移链
//!
//! 每个步骤把版本 N 的配置变换为版本 N+1。运行器从存储的版本开始，
//! 按升序依次应用步骤直到当前版本，不跳过也不重复。
//!
//! # 基本用法
//!
//! ```rust
//! use read_frog::config::migration::{MigrationOutcome, MigrationRegistry};
//! use serde_json::json;
//!
//! let registry = MigrationRegistry::builtin();
//! let outcome = registry
//!     .run("v009", json!({"providersConfig": {"ollama": {}}}))
//!     .unwrap();
//!
//! assert!(matches!(outcome, MigrationOutcome::Migrated { .. }));
//! assert_eq!(outcome.version(), registry.current_version());
//! ```

pub mod v009_to_v010;
pub mod v010_to_v011;
pub mod v011_to_v012;

use std::fmt;

use serde_json::Value;

use super::blob::kind_of;
use super::version::SchemaVersion;
use crate::error::MigrationError;

/// 迁移变换函数：只借用输入，返回新的配置
pub type MigrateFn = fn(&Value) -> Value;

/// 单个迁移步骤
#[derive(Clone, Copy)]
pub struct MigrationStep {
    pub from: SchemaVersion,
    pub to: SchemaVersion,
    pub description: &'static str,
    pub migrate: MigrateFn,
}

impl MigrationStep {
    /// 创建 `from -> from + 1` 的步骤
    pub const fn new(from: u32, description: &'static str, migrate: MigrateFn) -> Self {
        Self {
            from: SchemaVersion::new(from),
            to: SchemaVersion::new(from + 1),
            description,
            migrate,
        }
    }

    pub fn apply(&self, config: &Value) -> Value {
        (self.migrate)(config)
    }
}

impl fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationStep")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("description", &self.description)
            .finish()
    }
}

/// 内置的迁移步骤
pub const BUILTIN_STEPS: [MigrationStep; 3] = [
    MigrationStep::new(9, v009_to_v010::DESCRIPTION, v009_to_v010::migrate),
    MigrationStep::new(10, v010_to_v011::DESCRIPTION, v010_to_v011::migrate),
    MigrationStep::new(11, v011_to_v012::DESCRIPTION, v011_to_v012::migrate),
];

/// 迁移结果
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// 已是当前版本，配置原样返回
    UpToDate { version: SchemaVersion, config: Value },
    /// 应用了至少一个步骤
    Migrated {
        from: SchemaVersion,
        to: SchemaVersion,
        applied: Vec<&'static str>,
        config: Value,
    },
}

impl MigrationOutcome {
    pub fn version(&self) -> SchemaVersion {
        match self {
            MigrationOutcome::UpToDate { version, .. } => *version,
            MigrationOutcome::Migrated { to, .. } => *to,
        }
    }

    pub fn config(&self) -> &Value {
        match self {
            MigrationOutcome::UpToDate { config, .. } | MigrationOutcome::Migrated { config, .. } => {
                config
            }
        }
    }

    pub fn into_parts(self) -> (SchemaVersion, Value) {
        match self {
            MigrationOutcome::UpToDate { version, config } => (version, config),
            MigrationOutcome::Migrated { to, config, .. } => (to, config),
        }
    }

    pub fn changed(&self) -> bool {
        matches!(self, MigrationOutcome::Migrated { .. })
    }
}

/// 迁移注册表，排序的唯一依据
#[derive(Debug, Clone)]
pub struct MigrationRegistry {
    steps: Vec<MigrationStep>,
}

impl MigrationRegistry {
    /// 按 `from` 排序并校验步骤连续、单步递增
    pub fn new(mut steps: Vec<MigrationStep>) -> Result<Self, MigrationError> {
        steps.sort_by_key(|step| step.from);

        let first = steps.first().ok_or(MigrationError::EmptyRegistry)?;
        let mut expected = first.from;

        for step in &steps {
            if step.to != step.from.next() {
                return Err(MigrationError::InvalidStep {
                    from: step.from,
                    to: step.to,
                });
            }
            if step.from != expected {
                return Err(MigrationError::BrokenChain {
                    expected,
                    found: step.from,
                });
            }
            expected = step.to;
        }

        Ok(Self { steps })
    }

    /// 内置注册表
    pub fn builtin() -> Self {
        Self {
            steps: BUILTIN_STEPS.to_vec(),
        }
    }

    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    /// 最早可迁移的版本
    pub fn earliest_version(&self) -> SchemaVersion {
        self.steps[0].from
    }

    /// 当前（最新）版本
    pub fn current_version(&self) -> SchemaVersion {
        self.steps[self.steps.len() - 1].to
    }

    /// 从 `stored` 迁移到当前版本所需的步骤
    pub fn plan(&self, stored: SchemaVersion) -> Result<&[MigrationStep], MigrationError> {
        let current = self.current_version();
        if stored > current {
            return Err(MigrationError::FutureVersion { stored, current });
        }
        if stored == current {
            return Ok(&[]);
        }

        let earliest = self.earliest_version();
        if stored < earliest {
            return Err(MigrationError::NoMigrationPath { stored, earliest });
        }

        let start = (stored.get() - earliest.get()) as usize;
        Ok(&self.steps[start..])
    }

    /// 解析版本标签并迁移
    pub fn run(&self, stored_tag: &str, config: Value) -> Result<MigrationOutcome, MigrationError> {
        let stored: SchemaVersion = stored_tag.parse()?;
        self.migrate(stored, config)
    }

    /// 将配置从 `stored` 迁移到当前版本
    pub fn migrate(
        &self,
        stored: SchemaVersion,
        config: Value,
    ) -> Result<MigrationOutcome, MigrationError> {
        let plan = self.plan(stored)?;

        if plan.is_empty() {
            return Ok(MigrationOutcome::UpToDate {
                version: stored,
                config,
            });
        }

        let mut config = match config {
            Value::Object(_) => config,
            Value::Null => Value::Object(Default::default()),
            other => {
                return Err(MigrationError::NotAnObject {
                    version: stored,
                    found: kind_of(&other),
                })
            }
        };

        let mut applied = Vec::with_capacity(plan.len());
        for step in plan {
            tracing::debug!("应用配置迁移 {} -> {}: {}", step.from, step.to, step.description);
            config = step.apply(&config);
            applied.push(step.description);
        }

        let to = self.current_version();
        tracing::info!("配置已从 {} 迁移到 {}（{} 个步骤）", stored, to, applied.len());

        Ok(MigrationOutcome::Migrated {
            from: stored,
            to,
            applied,
            config,
        })
    }
}

impl Default for MigrationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

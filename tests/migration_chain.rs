//! 配置迁移链集成测试
//!
//! 测试内置迁移步骤的组合、旧版本配置的升级以及持久化后的启动流程

use serde_json::{json, Value};

use read_frog::config::migration::{v009_to_v010, v011_to_v012, MigrationOutcome};
use read_frog::config::{
    Config, ConfigStore, LoadSource, MigrationRegistry, PersistedConfig, SchemaVersion,
    TranslationNodeStyle, UnknownVersionPolicy,
};
use read_frog::MigrationError;

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{TestDataGenerator, TestEnvironment};

fn has_key(value: &Value, pointer: &str, key: &str) -> bool {
    value
        .pointer(pointer)
        .and_then(Value::as_object)
        .map_or(false, |section| section.contains_key(key))
}

/// 已清理过的配置再次迁移结果不变
#[test]
fn test_deprecation_is_idempotent() {
    let once = v009_to_v010::migrate(&TestDataGenerator::v009_config());
    let twice = v009_to_v010::migrate(&once);
    assert_eq!(once, twice);
}

/// 三个分区中的废弃提供商都被移除，值的类型不影响
#[test]
fn test_removal_is_complete() {
    let result = v009_to_v010::migrate(&TestDataGenerator::v009_config());

    for pointer in ["/providersConfig", "/read/models", "/translate/models"] {
        for provider in ["openrouter", "ollama"] {
            assert!(
                !has_key(&result, pointer, provider),
                "{provider} still present under {pointer}"
            );
        }
    }

    assert!(has_key(&result, "/providersConfig", "openai"));
    assert!(has_key(&result, "/translate/models", "microsoft"));
    assert_eq!(result["translate"]["requestQueueConfig"]["rate"], 5);
    assert_eq!(result["floatingButton"]["position"], 0.66);
}

/// 迁移不修改输入
#[test]
fn test_input_is_not_mutated() {
    let input = TestDataGenerator::v009_config();
    let snapshot = serde_json::to_string(&input).unwrap();

    let registry = MigrationRegistry::builtin();
    for step in registry.steps() {
        let _ = step.apply(&input);
    }

    assert_eq!(serde_json::to_string(&input).unwrap(), snapshot);
}

/// 缺失分区按空对象处理
#[test]
fn test_missing_sections_are_tolerated() {
    assert_eq!(
        v009_to_v010::migrate(&json!({})),
        json!({"providersConfig": {}, "read": {"models": {}}, "translate": {"models": {}}})
    );
}

/// 逐步应用与一次运行整条链的结果相同
#[test]
fn test_chain_composition() {
    let input = TestDataGenerator::v009_config();

    let stepwise = v011_to_v012::migrate(&v009_to_v010::migrate(&input));
    let outcome = MigrationRegistry::builtin().run("v009", input).unwrap();

    assert_eq!(outcome.config(), &stepwise);
    assert_eq!(outcome.version(), SchemaVersion::new(12));
    assert_eq!(stepwise["translate"]["translationNodeStyle"], "normal");
}

/// 迁移结果符合当前模式
#[test]
fn test_migrated_v009_config_matches_schema() {
    let outcome = MigrationRegistry::builtin()
        .run("v009", TestDataGenerator::v009_config())
        .unwrap();

    let config = Config::from_blob(outcome.config()).unwrap();

    assert_eq!(config.translate.translation_node_style, TranslationNodeStyle::Normal);
    assert_eq!(
        config.providers_config.keys().collect::<Vec<_>>(),
        vec!["deepseek", "openai"]
    );
    assert_eq!(config.providers_config["openai"].api_key.as_deref(), Some("sk-test"));
}

/// 已有的译文节点样式被保留
#[test]
fn test_existing_node_style_survives_the_chain() {
    let mut input = TestDataGenerator::v009_config();
    input["translate"]["translationNodeStyle"] = json!("blur");

    let outcome = MigrationRegistry::builtin().run("v010", input).unwrap();

    assert_eq!(outcome.config()["translate"]["translationNodeStyle"], "blur");
}

/// 未来版本与已是最新是可区分的
#[test]
fn test_future_version_is_distinct_from_up_to_date() {
    let registry = MigrationRegistry::builtin();

    assert!(matches!(
        registry.run("v012", json!({})),
        Ok(MigrationOutcome::UpToDate { .. })
    ));
    assert!(matches!(
        registry.run("v099", json!({})),
        Err(MigrationError::FutureVersion { .. })
    ));
}

/// 持久化的旧配置在启动时被迁移并写回文件数据库
#[test]
fn test_startup_migrates_persisted_config() {
    let env = TestEnvironment::new();
    let store = ConfigStore::new(env.db.clone());
    store
        .save(&PersistedConfig::new(
            SchemaVersion::new(9),
            TestDataGenerator::v009_config(),
        ))
        .unwrap();

    let loaded = store.initialize(UnknownVersionPolicy::Abort).unwrap();
    assert_eq!(
        loaded.source,
        LoadSource::Migrated {
            from: SchemaVersion::new(9)
        }
    );

    // 第二次启动时已是最新版本
    let reloaded = ConfigStore::new(env.db.clone())
        .initialize(UnknownVersionPolicy::Abort)
        .unwrap();
    assert_eq!(reloaded.source, LoadSource::UpToDate);
    assert_eq!(reloaded.config, loaded.config);
}

/// 未知的译文节点样式由最终的模式校验报告，按策略处理
#[test]
fn test_unknown_node_style_is_reported_after_the_chain() {
    let mut input = TestDataGenerator::v009_config();
    input["translate"]["translationNodeStyle"] = json!("sparkle");

    assert!(matches!(
        MigrationRegistry::builtin()
            .run("v011", input.clone())
            .map(|outcome| Config::from_blob(outcome.config())),
        Ok(Err(MigrationError::SchemaMismatch(_)))
    ));

    let env = TestEnvironment::new();
    let store = ConfigStore::new(env.db.clone());
    store
        .save(&PersistedConfig::new(SchemaVersion::new(11), input))
        .unwrap();

    let loaded = store.initialize(UnknownVersionPolicy::ResetToDefault).unwrap();
    assert!(matches!(
        loaded.source,
        LoadSource::Reset {
            reason: MigrationError::SchemaMismatch(_)
        }
    ));
    assert_eq!(loaded.config.translate.translation_node_style, TranslationNodeStyle::Normal);
}

/// 旧版本写入的整数版本号可以直接迁移
#[test]
fn test_integer_version_tag_in_envelope() {
    let envelope = json!({"schemaVersion": 10, "config": TestDataGenerator::v009_config()});

    let persisted = PersistedConfig::from_value(envelope).unwrap();
    assert_eq!(persisted.schema_version, "10");

    let outcome = MigrationRegistry::builtin()
        .run(&persisted.schema_version, persisted.config)
        .unwrap();
    assert_eq!(outcome.version(), SchemaVersion::new(12));

    assert!(matches!(
        PersistedConfig::from_value(json!({"schemaVersion": [9], "config": {}})),
        Err(MigrationError::CorruptSlot(_))
    ));
}

//! v009 -> v010: 移除 OpenRouter 与 Ollama
//!
//! 从 `providersConfig`、`read.models`、`translate.models` 中删除 `openrouter`
//! 和 `ollama` 两个键（键本身不存在，而不是值为空），其余内容原样保留。

use serde_json::Value;

use crate::config::blob::{copy_without, object_or_empty, section};

pub const DESCRIPTION: &str = "Deprecate OpenRouter and Ollama";

/// 已下线的提供商
pub const DEPRECATED_PROVIDERS: [&str; 2] = ["openrouter", "ollama"];

pub fn migrate(old_config: &Value) -> Value {
    let mut config = object_or_empty(Some(old_config));

    let providers = copy_without(config.get("providersConfig"), &DEPRECATED_PROVIDERS);
    config.insert("providersConfig".to_string(), Value::Object(providers));

    for feature in ["read", "translate"] {
        let mut feature_config = section(&config, feature);
        let models = copy_without(feature_config.get("models"), &DEPRECATED_PROVIDERS);
        feature_config.insert("models".to_string(), Value::Object(models));
        config.insert(feature.to_string(), Value::Object(feature_config));
    }

    Value::Object(config)
}

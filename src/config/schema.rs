//! 当前版本（v012）的配置模式
//!
//! 迁移过程中配置是无类型的 JSON 树，只有在最后一步之后才按这里的类型校验。
//! 未列出的字段通过 `extra` 原样保留。

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::MigrationError;

/// 译文节点样式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationNodeStyle {
    #[default]
    Normal,
    Blur,
}

impl TranslationNodeStyle {
    pub const ALL: [TranslationNodeStyle; 2] = [TranslationNodeStyle::Normal, TranslationNodeStyle::Blur];

    pub fn as_str(self) -> &'static str {
        match self {
            TranslationNodeStyle::Normal => "normal",
            TranslationNodeStyle::Blur => "blur",
        }
    }

    /// 渲染译文节点时附加的属性名，`Normal` 不需要
    pub fn marker_attribute(self) -> Option<&'static str> {
        match self {
            TranslationNodeStyle::Normal => None,
            TranslationNodeStyle::Blur => Some("read-frog-translation-blur-content"),
        }
    }
}

impl fmt::Display for TranslationNodeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationNodeStyle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TranslationNodeStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == value)
            .ok_or_else(|| format!("未知的译文节点样式: {}", value))
    }
}

/// 提供商连接配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 阅读功能配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// 每个提供商的模型设置；纯翻译提供商的值可以是 `null`
    #[serde(default)]
    pub models: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 翻译功能配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub models: BTreeMap<String, Value>,
    pub translation_node_style: TranslationNodeStyle,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 当前版本的完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub providers_config: BTreeMap<String, ProviderConfig>,
    pub read: ReadConfig,
    pub translate: TranslateConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Config {
    /// 按当前模式校验迁移后的配置
    pub fn from_blob(config: &Value) -> Result<Self, MigrationError> {
        Config::deserialize(config).map_err(|e| MigrationError::SchemaMismatch(e.to_string()))
    }

    pub fn to_blob(&self) -> Value {
        // 所有字段都可以表示为 JSON，序列化不会失败
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// 首次安装时写入的默认配置
pub fn default_config_blob() -> Value {
    json!({
        "language": {
            "detectedCode": "eng",
            "sourceCode": "auto",
            "targetCode": "cmn",
            "level": "intermediate"
        },
        "providersConfig": {
            "openai": {
                "baseURL": "https://api.openai.com/v1"
            },
            "deepseek": {
                "baseURL": "https://api.deepseek.com/v1"
            }
        },
        "read": {
            "provider": "openai",
            "models": {
                "openai": {"model": "gpt-4o-mini", "isCustomModel": false, "customModel": ""},
                "deepseek": {"model": "deepseek-chat", "isCustomModel": false, "customModel": ""}
            }
        },
        "translate": {
            "provider": "microsoft",
            "models": {
                "microsoft": null,
                "google": null,
                "openai": {"model": "gpt-4o-mini", "isCustomModel": false, "customModel": ""},
                "deepseek": {"model": "deepseek-chat", "isCustomModel": false, "customModel": ""}
            },
            "node": {"enabled": true, "hotkey": "Control"},
            "page": {"range": "main", "autoTranslatePatterns": []},
            "promptsConfig": {
                "prompt": "Read Frog: TRANSLATE_DEFAULT_PROMPT",
                "patterns": []
            },
            "requestQueueConfig": {"capacity": 300, "rate": 5},
            "translationNodeStyle": "normal"
        },
        "floatingButton": {"enabled": true, "position": 0.66},
        "sideContent": {"width": 400}
    })
}

//! 配置对象的通用操作
//!
//! 迁移步骤只借用输入并构造新的对象；缺失、`null` 或非对象的分段一律视为空对象。

use serde_json::{Map, Value};

/// 配置对象（顶层为 JSON 对象）
pub type ConfigBlob = Map<String, Value>;

/// 将值复制为对象；非对象（含 `null`）返回空对象
pub fn object_or_empty(value: Option<&Value>) -> ConfigBlob {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => ConfigBlob::new(),
    }
}

/// 读取 `parent[key]` 并复制为对象
pub fn section(parent: &ConfigBlob, key: &str) -> ConfigBlob {
    object_or_empty(parent.get(key))
}

/// 只复制未被排除的键
pub fn copy_without(value: Option<&Value>, excluded: &[&str]) -> ConfigBlob {
    match value {
        Some(Value::Object(map)) => map
            .iter()
            .filter(|(key, _)| !excluded.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        _ => ConfigBlob::new(),
    }
}

/// JSON 值的类型名，用于错误信息
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! v010 -> v011: 仅提升版本号
//!
//! 这一步没有本模块关心的结构变化，登记它是为了让迁移链保持连续。

use serde_json::Value;

use crate::config::blob::object_or_empty;

pub const DESCRIPTION: &str = "Schema version bump";

pub fn migrate(old_config: &Value) -> Value {
    Value::Object(object_or_empty(Some(old_config)))
}

//! v011 -> v012: 引入译文节点样式
//!
//! 缺失或为 `null` 时为 `translate.translationNodeStyle` 补上默认值 `"normal"`。
//! 已有的值原样保留，未知样式交给最终的模式校验报告。

use serde_json::Value;

use crate::config::blob::{object_or_empty, section};
use crate::config::schema::TranslationNodeStyle;

pub const DESCRIPTION: &str = "Integrate Translation Node Style";

const NODE_STYLE_KEY: &str = "translationNodeStyle";

pub fn migrate(old_config: &Value) -> Value {
    let mut config = object_or_empty(Some(old_config));
    let mut translate = section(&config, "translate");

    let present = translate
        .get(NODE_STYLE_KEY)
        .map_or(false, |style| !style.is_null());

    if !present {
        translate.insert(
            NODE_STYLE_KEY.to_string(),
            Value::String(TranslationNodeStyle::default().as_str().to_string()),
        );
    }

    config.insert("translate".to_string(), Value::Object(translate));
    Value::Object(config)
}

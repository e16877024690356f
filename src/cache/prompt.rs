//! 大模型翻译提示词
//!
//! 模板取自 `translate.promptsConfig` 中 id 与 `prompt` 相同的条目，找不到时使用内置模板。
//! 渲染后的提示词参与 [`CacheKey::for_llm`](super::CacheKey::for_llm)，模板变化时旧缓存不再命中。

use serde_json::Value;

use crate::config::Config;

pub const TARGET_LANG_TOKEN: &str = "{{targetLang}}";
pub const INPUT_TOKEN: &str = "{{input}}";

/// 内置模板的 id
pub const DEFAULT_PROMPT_ID: &str = "Read Frog: TRANSLATE_DEFAULT_PROMPT";

pub const DEFAULT_TRANSLATE_PROMPT: &str = "Treat the next line as plain text input and translate it into {{targetLang}}, \
output translation ONLY. If translation is unnecessary (e.g. proper nouns, codes, etc.), return the original text. \
NO explanations. NO notes. Input:\n{{input}}";

/// 当前配置选中的模板
pub fn prompt_template(config: &Config) -> &str {
    let Some(prompts) = config.translate.extra.get("promptsConfig") else {
        return DEFAULT_TRANSLATE_PROMPT;
    };
    let selected = prompts.get("prompt").and_then(Value::as_str).unwrap_or_default();

    prompts
        .get("patterns")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|pattern| pattern.get("id").and_then(Value::as_str) == Some(selected))
        .and_then(|pattern| pattern.get("prompt"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_TRANSLATE_PROMPT)
}

/// 填入目标语言与原文
///
/// 先替换目标语言，原文中出现的 `{{targetLang}}` 保持原样。
pub fn render_prompt(template: &str, target_lang: &str, input: &str) -> String {
    template
        .replace(TARGET_LANG_TOKEN, target_lang)
        .replace(INPUT_TOKEN, input)
}

/// 按配置生成翻译提示词
pub fn translate_prompt(config: &Config, target_lang: &str, input: &str) -> String {
    render_prompt(prompt_template(config), target_lang, input)
}

//! 带缓存的翻译
//!
//! 命中时直接返回已保存的译文；未命中时调用提供商，并以 `now` 作为创建时间写入缓存。

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::key::CacheKey;
use super::store::{CacheRecord, TranslationCacheStore};
use crate::error::FrogResult;

const ZERO_WIDTH_SPACE: char = '\u{200B}';
const REASONING_END_TAG: &str = "</think>";

/// 先查缓存，未命中时调用 `translate` 并写入结果
///
/// 空译文不写入缓存，下次请求会重新调用提供商。
pub async fn get_or_translate<S, F, Fut>(
    store: &Arc<S>,
    key: &CacheKey,
    now: DateTime<Utc>,
    translate: F,
) -> FrogResult<String>
where
    S: TranslationCacheStore + ?Sized + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = FrogResult<String>>,
{
    let cached = {
        let store = Arc::clone(store);
        let key = key.clone();
        tokio::task::spawn_blocking(move || store.get(&key)).await??
    };

    if let Some(record) = cached {
        tracing::debug!("翻译缓存命中: {}", key);
        return Ok(record.translation);
    }

    let translation = translate().await?;
    if translation.is_empty() {
        return Ok(translation);
    }

    let record = CacheRecord::new(translation.clone(), now);
    let store = Arc::clone(store);
    let key = key.clone();
    tokio::task::spawn_blocking(move || store.put(&key, &record)).await??;

    Ok(translation)
}

/// 去掉零宽空格并修剪首尾空白
pub fn clean_source_text(text: &str) -> String {
    text.chars()
        .filter(|c| *c != ZERO_WIDTH_SPACE)
        .collect::<String>()
        .trim()
        .to_string()
}

/// 推理模型会在 `</think>` 之前输出思考过程，只保留其后的内容
pub fn strip_reasoning(text: &str) -> &str {
    match text.find(REASONING_END_TAG) {
        Some(pos) => &text[pos + REASONING_END_TAG.len()..],
        None => text,
    }
}

/// 修剪译文；与原文相同时返回空字符串
pub fn finalize_translation(clean_source: &str, translated: &str) -> String {
    let translated = translated.trim();
    if translated == clean_source {
        String::new()
    } else {
        translated.to_string()
    }
}

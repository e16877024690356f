//! 缓存键
//!
//! 由请求内容派生：相同的输入总是得到相同的键，重复翻译复用同一条缓存。

use std::fmt;

use blake3::Hasher;

/// 翻译缓存键（blake3 十六进制摘要）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// 纯翻译提供商（Google、Microsoft 等）的键
    pub fn for_pure_provider(text: &str, provider: &str, source_lang: &str, target_lang: &str) -> Self {
        Self::from_parts(&[text, provider, source_lang, target_lang])
    }

    /// 大模型翻译的键，提示词变化时缓存失效
    pub fn for_llm(text: &str, provider: &str, model: &str, target_lang: &str, prompt: &str) -> Self {
        Self::from_parts(&[text, provider, model, target_lang, prompt])
    }

    /// 各部分带长度前缀，避免 `("ab", "c")` 与 `("a", "bc")` 冲突
    pub fn from_parts(parts: &[&str]) -> Self {
        let mut hasher = Hasher::new();
        for part in parts {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_input_same_key() {
        let a = CacheKey::for_pure_provider("Hello", "google", "auto", "zh");
        let b = CacheKey::for_pure_provider("Hello", "google", "auto", "zh");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_any_part_changes_key() {
        let base = CacheKey::for_llm("Hello", "openai", "gpt-4o-mini", "Japanese", "p");
        assert_ne!(base, CacheKey::for_llm("Hello", "openai", "gpt-4o-mini", "Japanese", "p2"));
        assert_ne!(base, CacheKey::for_llm("Hello", "deepseek", "gpt-4o-mini", "Japanese", "p"));
        assert_ne!(base, CacheKey::for_llm("Hello!", "openai", "gpt-4o-mini", "Japanese", "p"));
    }

    #[test]
    fn test_part_boundaries_matter() {
        assert_ne!(CacheKey::from_parts(&["ab", "c"]), CacheKey::from_parts(&["a", "bc"]));
    }
}

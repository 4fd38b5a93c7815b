use crate::types::FetchOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Version constants for cache invalidation
pub mod versions {
    pub const WIKISENSE_VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PARSER_VERSION: &str = "1.0.0";
}

/// Level 1 Cache Key (word + language + revision → page markup)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PageCacheKey {
    pub word: String,
    pub language_code: String,
    pub old_id: Option<u64>,
}

impl PageCacheKey {
    pub fn new(word: &str, language_code: &str, old_id: Option<u64>) -> Self {
        Self {
            word: word.to_string(),
            language_code: language_code.to_lowercase(),
            old_id,
        }
    }

    /// Compute cache key hash for storage
    pub fn to_cache_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.word.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.language_code.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.old_id.map(|id| id.to_string()).unwrap_or_default());
        format!("{:x}", hasher.finalize())
    }
}

/// Level 1 Cache Value (raw page markup with provenance)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPage {
    pub markup: String,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl CachedPage {
    pub fn new(markup: String, source: &str) -> Self {
        Self {
            markup,
            source: source.to_string(),
            fetched_at: Utc::now(),
        }
    }
}

/// Level 2 Cache Key (markup + config → parsed outcome)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct OutcomeCacheKey {
    pub markup_hash: String,
    pub config_hash: String,
    pub word: String,
    pub parser_version: String,
}

impl OutcomeCacheKey {
    pub fn new(markup_hash: String, config_hash: String, word: &str) -> Self {
        Self {
            markup_hash,
            config_hash,
            word: word.to_string(),
            parser_version: versions::PARSER_VERSION.to_string(),
        }
    }

    pub fn to_cache_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.markup_hash);
        hasher.update(&self.config_hash);
        hasher.update(self.word.as_bytes());
        hasher.update(&self.parser_version);
        format!("{:x}", hasher.finalize())
    }
}

/// Level 2 Cache Value (outcome with metadata)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedOutcome {
    pub outcome: FetchOutcome,
    pub created_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub cache_version: String,
}

impl CachedOutcome {
    pub fn new(outcome: FetchOutcome, processing_time_ms: u64) -> Self {
        Self {
            outcome,
            created_at: Utc::now(),
            processing_time_ms,
            cache_version: versions::WIKISENSE_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_key_hash_distinguishes_fields() {
        let base = PageCacheKey::new("cat", "en", None);
        assert_eq!(base.to_cache_hash(), PageCacheKey::new("cat", "EN", None).to_cache_hash());
        assert_ne!(base.to_cache_hash(), PageCacheKey::new("cat", "fr", None).to_cache_hash());
        assert_ne!(base.to_cache_hash(), PageCacheKey::new("cat", "en", Some(42)).to_cache_hash());
        assert_ne!(
            PageCacheKey::new("ab", "c", None).to_cache_hash(),
            PageCacheKey::new("a", "bc", None).to_cache_hash()
        );
    }

    #[test]
    fn test_outcome_key_includes_parser_version() {
        let key = OutcomeCacheKey::new("m".into(), "c".into(), "cat");
        assert_eq!(key.parser_version, versions::PARSER_VERSION);
        assert_eq!(key.to_cache_hash().len(), 64);
    }
}

use crate::cache::{CachedOutcome, CachedPage, OutcomeCacheKey, PageCacheKey};
use anyhow::{anyhow, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Storage abstraction for caching fetched pages and parse results
pub trait PageStorage: Send + Sync {
    // Level 1: page cache (word → markup)
    fn get_page(&self, key: &PageCacheKey) -> Result<Option<CachedPage>>;
    fn store_page(&self, key: &PageCacheKey, page: &CachedPage) -> Result<()>;

    // Level 2: outcome cache (markup + config → senses)
    fn get_outcome(&self, key: &OutcomeCacheKey) -> Result<Option<CachedOutcome>>;
    fn store_outcome(&self, key: &OutcomeCacheKey, outcome: &CachedOutcome) -> Result<()>;
}

/// File-based storage implementation using local cache directory
pub struct FileStorage {
    cache_dir: String,
}

impl FileStorage {
    pub fn new(cache_dir: &str) -> Result<Self> {
        fs::create_dir_all(format!("{cache_dir}/pages"))?;
        fs::create_dir_all(format!("{cache_dir}/outcomes"))?;

        Ok(Self {
            cache_dir: cache_dir.to_string(),
        })
    }

    fn page_path(&self, key: &PageCacheKey) -> String {
        format!("{}/pages/{}.json", self.cache_dir, key.to_cache_hash())
    }

    fn outcome_path(&self, key: &OutcomeCacheKey) -> String {
        format!("{}/outcomes/{}.json", self.cache_dir, key.to_cache_hash())
    }
}

impl PageStorage for FileStorage {
    fn get_page(&self, key: &PageCacheKey) -> Result<Option<CachedPage>> {
        let path = self.page_path(key);
        if Path::new(&path).exists() {
            let json_str = fs::read_to_string(path)?;
            let page: CachedPage = serde_json::from_str(&json_str)
                .map_err(|e| anyhow!("Failed to deserialize cached page: {}", e))?;
            Ok(Some(page))
        } else {
            Ok(None)
        }
    }

    fn store_page(&self, key: &PageCacheKey, page: &CachedPage) -> Result<()> {
        let path = self.page_path(key);
        let json_str = serde_json::to_string(page)
            .map_err(|e| anyhow!("Failed to serialize page: {}", e))?;
        fs::write(path, json_str)?;
        Ok(())
    }

    fn get_outcome(&self, key: &OutcomeCacheKey) -> Result<Option<CachedOutcome>> {
        let path = self.outcome_path(key);
        if Path::new(&path).exists() {
            let json_str = fs::read_to_string(path)?;
            let cached: CachedOutcome = serde_json::from_str(&json_str)
                .map_err(|e| anyhow!("Failed to deserialize cached outcome: {}", e))?;
            Ok(Some(cached))
        } else {
            Ok(None)
        }
    }

    fn store_outcome(&self, key: &OutcomeCacheKey, outcome: &CachedOutcome) -> Result<()> {
        let path = self.outcome_path(key);
        let json_str = serde_json::to_string_pretty(outcome)
            .map_err(|e| anyhow!("Failed to serialize outcome: {}", e))?;
        fs::write(path, json_str)?;
        Ok(())
    }
}

/// Calculate hash for page markup (for Level 2 cache key)
pub fn calculate_markup_hash(markup: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(markup.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Calculate hash for configuration data (for Level 2 cache key)
pub fn calculate_config_hash<T: serde::Serialize>(config: &T) -> Result<String> {
    let config_json = serde_json::to_string(config)
        .map_err(|e| anyhow!("Failed to serialize config for hashing: {}", e))?;

    let mut hasher = Sha256::new();
    hasher.update(config_json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// No-op storage implementation that disables all caching
pub struct NoOpStorage;

impl Default for NoOpStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl NoOpStorage {
    pub fn new() -> Self {
        Self
    }
}

impl PageStorage for NoOpStorage {
    fn get_page(&self, _key: &PageCacheKey) -> Result<Option<CachedPage>> {
        Ok(None) // Always cache miss
    }

    fn store_page(&self, _key: &PageCacheKey, _page: &CachedPage) -> Result<()> {
        Ok(()) // No-op
    }

    fn get_outcome(&self, _key: &OutcomeCacheKey) -> Result<Option<CachedOutcome>> {
        Ok(None) // Always cache miss
    }

    fn store_outcome(&self, _key: &OutcomeCacheKey, _outcome: &CachedOutcome) -> Result<()> {
        Ok(()) // No-op
    }
}

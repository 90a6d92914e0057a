use crate::config::CacheSettings;
use crate::domain::model::{CacheEntry, CacheMetadata, ContentSource};
use crate::domain::ports::Storage;
use crate::utils::error::{ContentError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// 32-bit rolling hash (`h * 31 + c` over UTF-16 units), rendered as hex.
/// Only used to derive cache file names for a small, fixed key set.
pub fn hash_key(key: &str) -> String {
    let hash = key
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit)));
    format!("{:x}", hash.unsigned_abs())
}

fn file_name(key: &str) -> String {
    format!("{}.json", hash_key(key))
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone)]
pub struct CacheOptions {
    pub ttl: Option<Duration>,
    pub source: ContentSource,
    pub metadata: Option<CacheMetadata>,
}

impl CacheOptions {
    pub fn new(source: ContentSource) -> Self {
        Self {
            ttl: None,
            source,
            metadata: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_metadata(mut self, metadata: CacheMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub memory_bytes: usize,
    pub max_memory_bytes: usize,
}

struct MemoryEntry {
    entry: CacheEntry<serde_json::Value>,
    size: usize,
}

/// Two-tier TTL cache: an in-process map in front of JSON files in a
/// [`Storage`]. Reads and writes never fail the caller's build; `set`
/// reports disk failures so callers can decide, `store` logs and moves on.
pub struct ContentCache<S: Storage> {
    storage: S,
    memory: Mutex<HashMap<String, MemoryEntry>>,
    enabled: bool,
    default_ttl: Duration,
    max_memory_bytes: usize,
}

impl<S: Storage> ContentCache<S> {
    pub fn new(storage: S, settings: &CacheSettings) -> Self {
        Self {
            storage,
            memory: Mutex::new(HashMap::new()),
            enabled: settings.enabled,
            default_ttl: settings.ttl,
            max_memory_bytes: settings.max_memory_bytes,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn memory(&self) -> MutexGuard<'_, HashMap<String, MemoryEntry>> {
        self.memory.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 先查記憶體，再查磁碟；磁碟命中會提升至記憶體。未命中與過期一律回傳 None
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }

        let now = now_ms();
        {
            let mut memory = self.memory();
            if let Some(cached) = memory.get(key) {
                if cached.entry.is_valid_at(now) {
                    tracing::debug!("🗄️ Memory cache hit: {}", key);
                    return decode(key, cached.entry.data.clone());
                }
                tracing::debug!("⌛ Memory cache entry expired: {}", key);
                memory.remove(key);
            }
        }

        let file = file_name(key);
        let bytes = match self.storage.read_file(&file).await {
            Ok(bytes) => bytes,
            Err(ContentError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Cache miss: {}", key);
                return None;
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to read cache file {} for {}: {}", file, key, e);
                return None;
            }
        };

        let entry: CacheEntry<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("⚠️ Ignoring unreadable cache file {}: {}", file, e);
                return None;
            }
        };

        if !entry.is_valid_at(now) {
            tracing::debug!("⌛ Disk cache entry expired: {}", key);
            if let Err(e) = self.storage.remove_file(&file).await {
                tracing::warn!("⚠️ Failed to remove expired cache file {}: {}", file, e);
            }
            return None;
        }

        tracing::debug!("💾 Disk cache hit: {}", key);
        let data = entry.data.clone();
        let size = serde_json::to_vec(&entry.data).map(|b| b.len()).unwrap_or(0);
        self.insert_memory(key, entry, size);
        decode(key, data)
    }

    /// 寫入兩層快取。記憶體一定會寫入；磁碟失敗時回傳錯誤
    pub async fn set<T: Serialize>(&self, key: &str, data: &T, options: CacheOptions) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let value = serde_json::to_value(data)?;
        let size = serde_json::to_vec(&value)?.len();
        let mut metadata = options.metadata.unwrap_or_default();
        metadata.size = Some(size);

        let entry = CacheEntry {
            data: value,
            timestamp: now_ms(),
            ttl: millis(options.ttl.unwrap_or(self.default_ttl)),
            source: options.source,
            metadata: Some(metadata),
        };

        let bytes = serde_json::to_vec_pretty(&entry)?;
        self.insert_memory(key, entry, size);

        let file = file_name(key);
        self.storage.write_file(&file, &bytes).await?;
        tracing::debug!("💾 Cached {} ({} bytes) as {}", key, size, file);
        Ok(())
    }

    /// Best-effort `set`: failures are logged and reported as `false`.
    pub async fn store<T: Serialize>(&self, key: &str, data: &T, options: CacheOptions) -> bool {
        match self.set(key, data, options).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("⚠️ Cache write for {} failed, continuing without it: {}", key, e);
                false
            }
        }
    }

    pub async fn invalidate(&self, key: &str) -> Result<()> {
        self.memory().remove(key);
        self.storage.remove_file(&file_name(key)).await
    }

    /// 清除記憶體及儲存目錄下所有 .json 快取檔，回傳刪除的檔案數
    pub async fn clear(&self) -> Result<usize> {
        self.memory().clear();

        let mut removed = 0;
        for file in self.storage.list_files().await? {
            if file.ends_with(".json") {
                self.storage.remove_file(&file).await?;
                removed += 1;
            }
        }
        tracing::info!("🧹 Cleared {} cache files", removed);
        Ok(removed)
    }

    pub fn stats(&self) -> CacheStats {
        let memory = self.memory();
        CacheStats {
            entries: memory.len(),
            memory_bytes: memory.values().map(|e| e.size).sum(),
            max_memory_bytes: self.max_memory_bytes,
        }
    }

    fn insert_memory(&self, key: &str, entry: CacheEntry<serde_json::Value>, size: usize) {
        let mut memory = self.memory();
        memory.insert(key.to_string(), MemoryEntry { entry, size });

        let used: usize = memory.values().map(|e| e.size).sum();
        if used > self.max_memory_bytes {
            evict_oldest_quarter(&mut memory);
        }
    }
}

/// 依寫入時間淘汰最舊的 25%（至少一筆）
fn evict_oldest_quarter(memory: &mut HashMap<String, MemoryEntry>) {
    let mut by_age: Vec<(i64, String)> = memory
        .iter()
        .map(|(key, e)| (e.entry.timestamp, key.clone()))
        .collect();
    by_age.sort();

    let count = memory.len().div_ceil(4).max(1);
    for (_, key) in by_age.into_iter().take(count) {
        tracing::debug!("🧹 Evicting cache entry: {}", key);
        memory.remove(&key);
    }
}

fn decode<T: DeserializeOwned>(key: &str, data: serde_json::Value) -> Option<T> {
    match serde_json::from_value(data) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("⚠️ Cached value for {} has an unexpected shape: {}", key, e);
            None
        }
    }
}

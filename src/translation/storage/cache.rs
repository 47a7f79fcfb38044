//! 翻译响应缓存
//!
//! 缓存键包含文档的编辑时间，文档被编辑后旧条目自然失效，无需主动清除。

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use lru::LruCache;

use crate::translation::error::{TranslationError, TranslationResult};

const KEY_PREFIX: &str = "translation";

/// 缓存键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub document_id: String,
    pub edited: String,
    pub to: String,
    pub region: String,
    pub batch: bool,
    /// 与目标语言不同的界面语言
    pub locale: Option<String>,
}

impl CacheKey {
    pub fn new(document_id: &str, edited: &str, to: &str, region: &str, batch: bool) -> Self {
        Self {
            document_id: document_id.to_string(),
            edited: edited.to_string(),
            to: to.to_string(),
            region: region.to_string(),
            batch,
            locale: None,
        }
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = Some(locale.to_string());
        self
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}:{}",
            KEY_PREFIX, self.document_id, self.edited, self.to, self.region, self.batch
        )?;

        match &self.locale {
            Some(locale) => write!(f, ":{}", locale),
            None => Ok(()),
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub expired: u64,
}

impl CacheStats {
    /// 命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// 键值缓存接口
pub trait CacheStore: Send + Sync {
    fn name(&self) -> &str;

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, TranslationResult<Option<String>>>;

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: String,
        ttl: Duration,
    ) -> BoxFuture<'a, TranslationResult<()>>;
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

/// 进程内 LRU 缓存，条目按 TTL 过期
pub struct MemoryCache {
    entries: Mutex<LruCache<String, MemoryEntry>>,
    stats: Mutex<CacheStats>,
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    fn lookup(&self, key: &str) -> TranslationResult<Option<String>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| TranslationError::CacheError(format!("缓存锁失败: {}", e)))?;

        let (value, expired) = match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => (Some(entry.value.clone()), false),
            Some(_) => (None, true),
            None => (None, false),
        };

        if expired {
            entries.pop(key);
        }
        drop(entries);

        if let Ok(mut stats) = self.stats.lock() {
            match value {
                Some(_) => stats.hits += 1,
                None => stats.misses += 1,
            }
            if expired {
                stats.expired += 1;
            }
        }

        Ok(value)
    }

    fn store(&self, key: &str, value: String, ttl: Duration) -> TranslationResult<()> {
        let entry = MemoryEntry {
            value,
            expires_at: Instant::now() + ttl,
        };

        self.entries
            .lock()
            .map_err(|e| TranslationError::CacheError(format!("缓存锁失败: {}", e)))?
            .put(key.to_string(), entry);

        if let Ok(mut stats) = self.stats.lock() {
            stats.writes += 1;
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }
}

impl CacheStore for MemoryCache {
    fn name(&self) -> &str {
        "memory"
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, TranslationResult<Option<String>>> {
        future::ready(self.lookup(key)).boxed()
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: String,
        ttl: Duration,
    ) -> BoxFuture<'a, TranslationResult<()>> {
        future::ready(self.store(key, value, ttl)).boxed()
    }
}

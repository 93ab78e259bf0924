use std::time::{Duration, Instant};

use moka::sync::Cache;
use moka::Expiry;

use super::DistributedCache;
use crate::config::CacheConfig;
use crate::error::CacheError;

#[derive(Debug, Clone)]
struct Entry {
    value: serde_json::Value,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process [`DistributedCache`] backed by moka.
///
/// Only shared between threads of one process. Deployments with separate
/// worker processes plug in a networked backend instead.
#[derive(Clone)]
pub struct MemoryCache {
    inner: Cache<String, Entry>,
}

impl MemoryCache {
    pub fn new(max_entries: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();
        Self { inner }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl DistributedCache for MemoryCache {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.inner.get(key).map(|entry| entry.value)
    }

    fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Err(CacheError::Backend {
                key: key.to_string(),
                reason: "ttl must be greater than zero".to_string(),
            });
        }
        self.inner.insert(key.to_string(), Entry { value, ttl });
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.inner.invalidate(key);
    }
}

//! Cache manager.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use super::backend::CacheBackend;
use super::key::CacheKey;

pub const TEXT_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);
pub const MEDIA_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub expiry: Duration,
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expiry: TEXT_EXPIRY,
            enabled: true,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// On-disk envelope: `{"cached_at": <unix seconds>, "data": <record>}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub cached_at: f64,
    pub data: T,
}

impl<T> CacheEntry<T> {
    pub fn age(&self, now: SystemTime) -> f64 {
        unix_seconds(now) - self.cached_at
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub expired: u64,
    pub errors: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    expired: AtomicU64,
    errors: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Expiring record cache over a [`CacheBackend`].
///
/// Neither `get` nor `put` ever fails the caller: unreadable entries are
/// treated as absent and write errors are logged and counted.
pub struct CacheManager {
    config: CacheConfig,
    backend: Box<dyn CacheBackend>,
    stats: Arc<AtomicStats>,
}

impl CacheManager {
    pub fn new(config: CacheConfig, backend: Box<dyn CacheBackend>) -> Self {
        Self {
            config,
            backend,
            stats: Arc::new(AtomicStats::default()),
        }
    }

    pub fn expiry(&self) -> Duration {
        self.config.expiry
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        self.get_at(key, SystemTime::now()).await
    }

    /// Look up `key` as of `now`. Expired and corrupt entries are deleted.
    pub async fn get_at<T: DeserializeOwned>(&self, key: &CacheKey, now: SystemTime) -> Option<T> {
        if !self.config.enabled {
            return None;
        }
        let raw = match self.backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed");
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %key, error = %e, "discarding unreadable cache entry");
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                self.remove(key).await;
                return None;
            }
        };

        if entry.age(now) > self.config.expiry.as_secs_f64() {
            debug!(key = %key, "cache entry expired");
            self.stats.expired.fetch_add(1, Ordering::Relaxed);
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            self.remove(key).await;
            return None;
        }

        self.stats.hits.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, "cache hit");
        Some(entry.data)
    }

    pub async fn put<T: Serialize>(&self, key: &CacheKey, value: &T) {
        self.put_at(key, value, SystemTime::now()).await
    }

    /// Store `value` with an explicit `cached_at` timestamp.
    pub async fn put_at<T: Serialize>(&self, key: &CacheKey, value: &T, cached_at: SystemTime) {
        if !self.config.enabled {
            return;
        }
        let entry = CacheEntry {
            cached_at: unix_seconds(cached_at),
            data: value,
        };
        let data = match serde_json::to_vec_pretty(&entry) {
            Ok(data) => data,
            Err(e) => {
                warn!(key = %key, error = %e, "cache entry not serializable");
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };
        match self.backend.set(key, &data).await {
            Ok(()) => {
                self.stats.sets.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                warn!(key = %key, backend = self.backend.name(), error = %e, "cache write failed");
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub async fn clear(&self) -> crate::Result<()> {
        self.backend.clear().await
    }

    pub async fn len(&self) -> usize {
        self.backend.len().await.unwrap_or(0)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    async fn remove(&self, key: &CacheKey) {
        if let Err(e) = self.backend.delete(key).await {
            warn!(key = %key, error = %e, "failed to remove cache entry");
            self.stats.errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn unix_seconds(t: SystemTime) -> f64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

//! 记录缓存模块：以内容哈希为键的磁盘缓存，带固定过期时间。
//!
//! # Record Cache
//!
//! Every generated record is cached under the MD5 digest of the request's
//! identifying fields, so repeated runs over the same subjects skip the
//! provider round trips entirely.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheManager`] | Expiry, (de)serialization and statistics |
//! | [`CacheConfig`] | Expiry and on/off switch |
//! | [`CacheBackend`] | Trait for byte-level storage |
//! | [`FileCache`] | One `<hash>.json` file per key, atomic writes |
//! | [`NullCache`] | No-op backend used by `--no-cache` |
//! | [`CacheKey`] | MD5 key derived from request fields |
//!
//! ## On-disk format
//!
//! ```text
//! <cache_dir>/<md5hex>.json
//! { "cached_at": 1718000000.25, "data": { ...record... } }
//! ```
//!
//! An entry is valid while `now - cached_at <= expiry`. Expired or
//! unreadable entries are deleted the first time they are read.
//!
//! ## Example
//!
//! ```rust,no_run
//! use edu_forge::cache::{CacheConfig, CacheKey, CacheManager, FileCache, TEXT_EXPIRY};
//!
//! # async fn demo() {
//! let cache = CacheManager::new(
//!     CacheConfig::new().with_expiry(TEXT_EXPIRY),
//!     Box::new(FileCache::new("cache")),
//! );
//! let key = CacheKey::from_parts(&["Photosynthesis", "content"]);
//! cache.put(&key, &serde_json::json!({"title": "Photosynthesis"})).await;
//! let hit: Option<serde_json::Value> = cache.get(&key).await;
//! # }
//! ```

mod backend;
mod key;
mod manager;

pub use backend::{CacheBackend, FileCache, NullCache};
pub use key::CacheKey;
pub use manager::{CacheConfig, CacheEntry, CacheManager, CacheStats, MEDIA_EXPIRY, TEXT_EXPIRY};

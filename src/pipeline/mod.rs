//! 内容流水线模块：缓存、提供方链、元数据合成、校验与持久化的编排。
//!
//! # Content Pipeline
//!
//! One [`ContentPipeline`] per content domain turns a request into a
//! validated [`ContentRecord`]:
//!
//! ```text
//! request → cache lookup ──hit──────────────────────────────┐
//!              │ miss                                        │
//!              ▼                                             ▼
//!        ProviderChain (retry per provider) → fallback → describe
//!                                                     → validate
//!                                                     → write media
//!                                                     → cache write → persist
//! ```
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ContentDomain`] | What a domain plugs in: cache key, chain, record synthesis |
//! | [`ContentPipeline`] | Generic driver shared by every domain |
//! | [`ProviderChain`] | Ordered providers ending in a local fallback |
//! | [`RetryPolicy`] | Bounded exponential backoff per provider |
//! | [`RecordOrigin`] | Where a returned record came from |
//!
//! ## Example
//!
//! ```rust,no_run
//! use edu_forge::config::{Credentials, PipelineConfig};
//! use edu_forge::pipeline::ContentPipeline;
//! use edu_forge::topics::{TopicRequest, TopicSummaryDomain};
//!
//! # async fn run() -> edu_forge::Result<()> {
//! let config = PipelineConfig::default();
//! let domain = TopicSummaryDomain::new(&config, &Credentials::from_env())?;
//! let pipeline = ContentPipeline::from_config(domain, &config)?;
//! let processed = pipeline.run(&TopicRequest::new("photosynthesis")?).await?;
//! println!("{} from {}", processed.record.id(), processed.origin);
//! # Ok(())
//! # }
//! ```

mod fallback;
mod retry;

pub use fallback::{AttemptOutcome, ChainOutcome, ProviderAttempt, ProviderChain};
pub use retry::{Retried, RetryPolicy};

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, CacheKey, CacheManager, FileCache, NullCache};
use crate::config::PipelineConfig;
use crate::output::OutputWriter;
use crate::schema::SchemaValidator;
use crate::types::{ContentRecord, MediaAsset, RecordKind};
use crate::Result;

/// A use case plugged into [`ContentPipeline`].
#[async_trait]
pub trait ContentDomain: Send + Sync {
    type Request: Send + Sync;
    /// What the provider chain produces before metadata is attached.
    type Candidate: Send + Sync;

    fn kind(&self) -> RecordKind;

    /// Human-readable subject, used in logs.
    fn subject<'r>(&self, request: &'r Self::Request) -> &'r str;

    fn cache_key(&self, request: &Self::Request) -> CacheKey;

    /// Default lifetime of cached records for this domain.
    fn cache_expiry(&self) -> Duration;

    /// Subdirectory of the output root that media files go into.
    fn media_dir(&self) -> &'static str;

    /// Run the provider chain. Never fails: the chain ends in a local fallback.
    async fn fetch(&self, request: &Self::Request) -> ChainOutcome<Self::Candidate>;

    /// Assets of `candidate` to write under [`ContentDomain::media_dir`].
    fn media<'c>(&self, candidate: &'c Self::Candidate) -> Vec<&'c MediaAsset>;

    /// Attach catalog metadata and build the output record. `media_dir` is
    /// where file assets will be written.
    fn describe(
        &self,
        request: &Self::Request,
        outcome: &ChainOutcome<Self::Candidate>,
        media_dir: &Path,
    ) -> Result<ContentRecord>;

    /// Adapt a record cached under this request's key to the request
    /// itself. The default returns it unchanged.
    fn restamp(&self, _request: &Self::Request, cached: ContentRecord, _media_dir: &Path) -> Restamped {
        Restamped::unchanged(cached)
    }
}

/// A cached record rewritten for the request that hit it.
#[derive(Debug, Clone, PartialEq)]
pub struct Restamped {
    pub record: ContentRecord,
    /// Media files to copy before the record is used, `(existing, new)`.
    pub copies: Vec<(PathBuf, PathBuf)>,
}

impl Restamped {
    pub fn unchanged(record: ContentRecord) -> Self {
        Self {
            record,
            copies: Vec::new(),
        }
    }
}

/// Where a processed record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOrigin {
    Cache,
    Provider(String),
    /// The local fallback; the record is complete but degraded.
    Fallback(String),
}

impl RecordOrigin {
    pub fn is_degraded(&self) -> bool {
        matches!(self, RecordOrigin::Fallback(_))
    }
}

impl fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordOrigin::Cache => f.write_str("cache"),
            RecordOrigin::Provider(tag) => write!(f, "provider {}", tag),
            RecordOrigin::Fallback(tag) => write!(f, "fallback {}", tag),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Processed {
    pub record: ContentRecord,
    pub origin: RecordOrigin,
    /// Empty for cache hits.
    pub attempts: Vec<ProviderAttempt>,
}

pub struct ContentPipeline<D: ContentDomain> {
    domain: D,
    cache: CacheManager,
    validator: SchemaValidator,
    writer: OutputWriter,
}

impl<D: ContentDomain> ContentPipeline<D> {
    pub fn new(domain: D, cache: CacheManager, validator: SchemaValidator, writer: OutputWriter) -> Self {
        Self {
            domain,
            cache,
            validator,
            writer,
        }
    }

    /// File cache under `config.cache_dir` (or none when disabled), the
    /// bundled schema for the domain, and a writer rooted at `output_dir`.
    pub fn from_config(domain: D, config: &PipelineConfig) -> Result<Self> {
        let expiry = config
            .cache_expiry_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| domain.cache_expiry());
        let cache_config = CacheConfig::new()
            .with_expiry(expiry)
            .with_enabled(config.cache_enabled);
        let cache = if config.cache_enabled {
            CacheManager::new(cache_config, Box::new(FileCache::new(&config.cache_dir)))
        } else {
            CacheManager::new(cache_config, Box::new(NullCache::new()))
        };
        let validator = SchemaValidator::for_kind(domain.kind())?;
        Ok(Self::new(domain, cache, validator, OutputWriter::new(&config.output_dir)))
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn writer(&self) -> &OutputWriter {
        &self.writer
    }

    /// Produce a validated record without writing the per-subject file.
    pub async fn process(&self, request: &D::Request) -> Result<Processed> {
        let subject = self.domain.subject(request);
        let key = self.domain.cache_key(request);
        let media_dir = self.writer.media_dir(self.domain.media_dir());

        if let Some(record) = self.from_cache(request, &key, &media_dir).await {
            info!(kind = %self.domain.kind(), subject, "served from cache");
            return Ok(Processed {
                record,
                origin: RecordOrigin::Cache,
                attempts: Vec::new(),
            });
        }

        let outcome = self.domain.fetch(request).await;
        let record = self.domain.describe(request, &outcome, &media_dir)?;
        self.validator.check(&record.to_value()?)?;

        for asset in self.domain.media(&outcome.value) {
            self.writer.write_media(&media_dir, asset).await?;
        }
        self.cache.put(&key, &record).await;

        let origin = if outcome.degraded {
            warn!(kind = %self.domain.kind(), subject, source = %outcome.source, "record built from local fallback");
            RecordOrigin::Fallback(outcome.source)
        } else {
            info!(kind = %self.domain.kind(), subject, source = %outcome.source, "record generated");
            RecordOrigin::Provider(outcome.source)
        };
        Ok(Processed {
            record,
            origin,
            attempts: outcome.attempts,
        })
    }

    /// Write the per-subject record file.
    pub async fn persist(&self, record: &ContentRecord) -> Result<PathBuf> {
        self.writer.write_record(record).await
    }

    /// [`ContentPipeline::process`] followed by [`ContentPipeline::persist`].
    pub async fn run(&self, request: &D::Request) -> Result<Processed> {
        let processed = self.process(request).await?;
        self.persist(&processed.record).await?;
        Ok(processed)
    }

    /// The cached record restamped for `request`, with its media copied.
    /// Missing media or a restamped record failing the schema count as a miss.
    async fn from_cache(&self, request: &D::Request, key: &CacheKey, media_dir: &Path) -> Option<ContentRecord> {
        let cached = self.cached(key).await?;
        let Restamped { record, copies } = self.domain.restamp(request, cached, media_dir);
        for (from, to) in &copies {
            if let Err(e) = self.writer.copy_media(from, to).await {
                warn!(key = %key, from = %from.display(), error = %e, "cached media unavailable, regenerating");
                return None;
            }
        }
        let value = record.to_value().ok()?;
        if let Err(e) = self.validator.check(&value) {
            warn!(key = %key, error = %e, "restamped record invalid, regenerating");
            return None;
        }
        Some(record)
    }

    /// A cached record, if it still decodes and passes the schema.
    async fn cached(&self, key: &CacheKey) -> Option<ContentRecord> {
        let value: Value = self.cache.get(key).await?;
        if let Err(e) = self.validator.check(&value) {
            warn!(key = %key, error = %e, "cached record no longer valid, regenerating");
            return None;
        }
        match ContentRecord::decode(self.domain.kind(), value) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(key = %key, error = %e, "cached record does not decode, regenerating");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{timestamp_now, Audience, TopicSummary};
    use crate::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Topic-shaped domain whose "chain" is a counter.
    struct Counting {
        fetches: AtomicU32,
        degraded: bool,
        educational_value: u8,
    }

    impl Counting {
        fn new(degraded: bool) -> Self {
            Self {
                fetches: AtomicU32::new(0),
                degraded,
                educational_value: 8,
            }
        }
    }

    #[async_trait]
    impl ContentDomain for Counting {
        type Request = String;
        type Candidate = MediaAsset;

        fn kind(&self) -> RecordKind {
            RecordKind::TopicSummary
        }
        fn subject<'r>(&self, request: &'r String) -> &'r str {
            request
        }
        fn cache_key(&self, request: &String) -> CacheKey {
            CacheKey::from_parts(&[request.as_str(), "content"])
        }
        fn cache_expiry(&self) -> Duration {
            Duration::from_secs(60)
        }
        fn media_dir(&self) -> &'static str {
            "images"
        }
        async fn fetch(&self, request: &String) -> ChainOutcome<MediaAsset> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            ChainOutcome {
                value: MediaAsset::placeholder(format!("{}_diagram.txt", request), "D"),
                source: if self.degraded { "generated" } else { "wikipedia" }.to_string(),
                degraded: self.degraded,
                attempts: Vec::new(),
            }
        }
        fn media<'c>(&self, candidate: &'c MediaAsset) -> Vec<&'c MediaAsset> {
            vec![candidate]
        }
        fn describe(
            &self,
            request: &String,
            outcome: &ChainOutcome<MediaAsset>,
            media_dir: &Path,
        ) -> Result<ContentRecord> {
            Ok(TopicSummary {
                id: uuid::Uuid::new_v4().to_string(),
                title: request.clone(),
                description: "d".into(),
                page_url: "https://en.wikipedia.org/wiki/X".into(),
                image_url: outcome.value.reference(media_dir),
                license: "CC BY-SA 4.0".into(),
                attribution: "Generated Educational Content".into(),
                learning_objectives: vec!["o".into()],
                difficulty_level: Audience::HighSchool,
                related_topics: vec![],
                created_at: timestamp_now(),
                source: outcome.source.clone(),
                image_quality: "generated".into(),
                educational_value: self.educational_value,
            }
            .into())
        }
    }

    fn pipeline(domain: Counting, root: &Path) -> ContentPipeline<Counting> {
        let config = PipelineConfig::default()
            .with_output_dir(root.join("out"))
            .with_cache_dir(root.join("cache"));
        ContentPipeline::from_config(domain, &config).unwrap()
    }

    #[tokio::test]
    async fn test_second_call_is_cache_hit_with_identical_record() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(Counting::new(false), dir.path());

        let first = pipeline.run(&"tides".to_string()).await.unwrap();
        assert_eq!(first.origin, RecordOrigin::Provider("wikipedia".into()));
        let second = pipeline.run(&"tides".to_string()).await.unwrap();
        assert_eq!(second.origin, RecordOrigin::Cache);
        assert_eq!(second.record, first.record);
        assert_eq!(pipeline.domain().fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_record_is_persisted_with_media() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(Counting::new(true), dir.path());

        let processed = pipeline.run(&"tides".to_string()).await.unwrap();
        assert!(processed.origin.is_degraded());
        assert!(dir.path().join("out/images/tides_diagram.txt").is_file());
        assert!(dir.path().join("out/packages/tides.json").is_file());
    }

    #[tokio::test]
    async fn test_invalid_record_is_neither_cached_nor_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut domain = Counting::new(false);
        domain.educational_value = 42;
        let pipeline = pipeline(domain, dir.path());

        let err = pipeline.run(&"tides".to_string()).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(pipeline.cache().len().await, 0);
        assert!(!dir.path().join("out/packages/tides.json").exists());
    }

    #[tokio::test]
    async fn test_disabled_cache_always_fetches() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::default()
            .with_output_dir(dir.path().join("out"))
            .with_cache_dir(dir.path().join("cache"))
            .with_cache_enabled(false);
        let pipeline = ContentPipeline::from_config(Counting::new(false), &config).unwrap();

        pipeline.process(&"tides".to_string()).await.unwrap();
        pipeline.process(&"tides".to_string()).await.unwrap();
        assert_eq!(pipeline.domain().fetches.load(Ordering::SeqCst), 2);
        assert!(!dir.path().join("cache").exists());
    }
}

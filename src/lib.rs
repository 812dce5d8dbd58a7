//! # edu-forge
//!
//! 这是一个教育内容生成流水线：缓存、提供方回退链、元数据合成、模式校验与批量持久化。
//!
//! Fetch-cache-validate pipeline for generated educational content. Three
//! content domains share one engine:
//!
//! - **Shape analogies**: polygon comparisons with an illustration and three
//!   follow-up questions.
//! - **Topic summaries**: an encyclopedia extract with learning objectives and
//!   an image.
//! - **Concept animations**: a short generated animation with learning goals.
//!
//! ## Core Behaviour
//!
//! - **Cache first**: records are cached on disk under an MD5 key with a
//!   per-domain expiry.
//! - **Never empty-handed**: providers are tried in a fixed order with
//!   bounded retry, and the chain always ends in a local fallback.
//! - **Validated output**: nothing is cached or written unless it passes the
//!   record's JSON Schema.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edu_forge::config::{Credentials, PipelineConfig};
//! use edu_forge::pipeline::ContentPipeline;
//! use edu_forge::animations::{AnimationRequest, ConceptAnimationDomain};
//!
//! #[tokio::main]
//! async fn main() -> edu_forge::Result<()> {
//!     let config = PipelineConfig::default().with_env_overrides();
//!     config.prepare_dirs()?;
//!
//!     let domain = ConceptAnimationDomain::new(&config, &Credentials::from_env())?;
//!     let pipeline = ContentPipeline::from_config(domain, &config)?;
//!     let processed = pipeline.run(&AnimationRequest::new("Sine wave", 8)?).await?;
//!     println!("{:?} via {}", processed.record.id(), processed.origin);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`pipeline`] | Content pipeline, provider chain and retry |
//! | [`providers`] | External APIs and local placeholders |
//! | [`cache`] | MD5-keyed disk cache with expiry |
//! | [`schema`] | Bundled Draft-7 schemas and validation |
//! | [`batch`] | Sequential batch runner |
//! | [`shapes`] | Shape analogy domain |
//! | [`topics`] | Topic summary domain |
//! | [`animations`] | Concept animation domain |
//! | [`output`] | Record, aggregate and media files |
//! | [`config`] | Configuration and credentials |
//! | [`types`] | Records, levels and media assets |

pub mod animations;
pub mod batch;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod schema;
pub mod shapes;
pub mod topics;
pub mod transport;
pub mod types;

pub use pipeline::{ContentDomain, ContentPipeline, Processed, RecordOrigin};
pub use types::{ContentRecord, RecordKind};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};

//! 批处理模块：按顺序处理多个请求并汇总输出。
//!
//! # Batch Processing
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BatchRunner`] | Sequential driver with a pause between items |
//! | [`BatchResult`] | Successes in input order, failures, timing, aggregate path |
//! | [`BatchError`] | Why one subject produced no record |
//!
//! ## Example
//!
//! ```rust,no_run
//! use edu_forge::batch::BatchRunner;
//! use edu_forge::config::{Credentials, PipelineConfig};
//! use edu_forge::pipeline::ContentPipeline;
//! use edu_forge::animations::{AnimationRequest, ConceptAnimationDomain};
//! use edu_forge::types::RecordKind;
//!
//! # async fn run() -> edu_forge::Result<()> {
//! let config = PipelineConfig::default();
//! let domain = ConceptAnimationDomain::new(&config, &Credentials::from_env())?;
//! let pipeline = ContentPipeline::from_config(domain, &config)?;
//! let requests = vec![
//!     AnimationRequest::new("Sine wave", 8)?,
//!     AnimationRequest::new("Planetary orbits", 12)?,
//! ];
//! let result = BatchRunner::for_kind(RecordKind::ConceptAnimation, &config)
//!     .run(&pipeline, &requests)
//!     .await?;
//! println!("{} of {} succeeded", result.success_count(), result.total_processed);
//! # Ok(())
//! # }
//! ```

mod executor;

pub use executor::{default_item_delay, BatchError, BatchResult, BatchRunner};

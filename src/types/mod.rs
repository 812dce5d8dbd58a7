//! 类型模块：请求分级枚举、输出记录与媒体资源。
//!
//! # Types Module
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ContentRecord`] | Validated output record, one variant per domain |
//! | [`RecordKind`] | Domain discriminator (schema, output layout) |
//! | [`Complexity`] | Shape-analogy tier: beginner, intermediate, advanced |
//! | [`Audience`] | Audience / difficulty level |
//! | [`AnimationType`] | `gif` or `mp4` |
//! | [`MediaAsset`] | Media reference or bytes not yet written |

mod level;
mod media;
mod record;

pub use level::{AnimationType, Audience, Complexity};
pub use media::MediaAsset;
pub use record::{
    timestamp_now, ConceptAnimation, ContentRecord, RecordKind, ShapeAnalogy, TopicSummary,
};

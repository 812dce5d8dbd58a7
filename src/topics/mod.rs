//! 主题摘要模块：百科文章、图片来源与学习元数据。
//!
//! # Topic Summaries
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`catalog`] | Curated learning objectives and the generic profile |
//! | [`TopicSummaryDomain`] | Article chain (Wikipedia → generated), then image chain (Unsplash → Pexels → diagram) when the article has no image |

pub mod catalog;
mod domain;

pub use domain::{TopicCandidate, TopicRequest, TopicSummaryDomain};

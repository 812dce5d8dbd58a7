//! 输出校验模块：每种记录对应一个内置的 Draft-7 JSON Schema。
//!
//! # Record Schemas
//!
//! Every record is checked against the schema of its kind before it is
//! cached or written. A record that fails is discarded and the request for
//! that subject is reported as failed.
//!
//! | Kind | Schema | Closed enums |
//! |------|--------|--------------|
//! | `shape-analogy` | `shape_analogy.json` | `complexity_level` |
//! | `topic-summary` | `topic_summary.json` | `difficulty_level` |
//! | `concept-animation` | `concept_animation.json` | `target_audience`, `animation_type` |
//!
//! The documents are compiled into the binary; `edu-forge schema <kind>`
//! prints them.

mod validator;

pub use validator::{SchemaValidator, ValidationError};

use crate::types::RecordKind;

const SHAPE_ANALOGY: &str = include_str!("shape_analogy.json");
const TOPIC_SUMMARY: &str = include_str!("topic_summary.json");
const CONCEPT_ANIMATION: &str = include_str!("concept_animation.json");

/// Raw JSON Schema document for `kind`.
pub fn schema_document(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::ShapeAnalogy => SHAPE_ANALOGY,
        RecordKind::TopicSummary => TOPIC_SUMMARY,
        RecordKind::ConceptAnimation => CONCEPT_ANIMATION,
    }
}

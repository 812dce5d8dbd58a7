//! Validated output records, one struct per content domain.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::level::{AnimationType, Audience, Complexity};
use crate::{Error, ErrorContext, Result};

/// Which domain a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    ShapeAnalogy,
    TopicSummary,
    ConceptAnimation,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::ShapeAnalogy,
        RecordKind::TopicSummary,
        RecordKind::ConceptAnimation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::ShapeAnalogy => "shape-analogy",
            RecordKind::TopicSummary => "topic-summary",
            RecordKind::ConceptAnimation => "concept-animation",
        }
    }

    /// Directory under the output root holding per-subject record files.
    pub fn record_dir(&self) -> &'static str {
        match self {
            RecordKind::ShapeAnalogy => "",
            RecordKind::TopicSummary => "packages",
            RecordKind::ConceptAnimation => "metadata",
        }
    }

    pub fn aggregate_file(&self) -> &'static str {
        match self {
            RecordKind::ShapeAnalogy => "analogies.json",
            RecordKind::TopicSummary => "educational_packages_batch.json",
            RecordKind::ConceptAnimation => "animation_batch_results.json",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RecordKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| Error::validation(format!("unknown record kind '{}'", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeAnalogy {
    pub id: String,
    pub prompt: String,
    pub model: String,
    pub seed: u32,
    pub created_at: String,
    pub image_url: String,
    pub complexity_level: Complexity,
    pub estimated_time_minutes: u32,
    pub tricky_questions: Vec<String>,
    pub shape_a: String,
    pub shape_b: String,
    pub relationship: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub page_url: String,
    pub image_url: String,
    pub license: String,
    pub attribution: String,
    pub learning_objectives: Vec<String>,
    pub difficulty_level: Audience,
    pub related_topics: Vec<String>,
    pub created_at: String,
    pub source: String,
    pub image_quality: String,
    /// 1 to 10.
    pub educational_value: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptAnimation {
    pub id: String,
    pub concept: String,
    pub animation_path: String,
    pub duration: u32,
    pub target_audience: Audience,
    pub animation_type: AnimationType,
    pub model_used: String,
    pub created_at: String,
    pub file_size: u64,
    pub resolution: String,
    pub quality: String,
    pub learning_goals: Vec<String>,
    pub key_learning_points: Vec<String>,
    pub tricky_questions: Vec<String>,
    pub educational_value: u8,
}

/// A record from any domain. Serialized as the flat inner object; use
/// [`ContentRecord::decode`] to read one back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentRecord {
    ShapeAnalogy(ShapeAnalogy),
    TopicSummary(TopicSummary),
    ConceptAnimation(ConceptAnimation),
}

impl ContentRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            ContentRecord::ShapeAnalogy(_) => RecordKind::ShapeAnalogy,
            ContentRecord::TopicSummary(_) => RecordKind::TopicSummary,
            ContentRecord::ConceptAnimation(_) => RecordKind::ConceptAnimation,
        }
    }

    pub fn decode(kind: RecordKind, value: Value) -> Result<Self> {
        let record = match kind {
            RecordKind::ShapeAnalogy => ContentRecord::ShapeAnalogy(serde_json::from_value(value)?),
            RecordKind::TopicSummary => ContentRecord::TopicSummary(serde_json::from_value(value)?),
            RecordKind::ConceptAnimation => {
                ContentRecord::ConceptAnimation(serde_json::from_value(value)?)
            }
        };
        Ok(record)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn id(&self) -> &str {
        match self {
            ContentRecord::ShapeAnalogy(r) => &r.id,
            ContentRecord::TopicSummary(r) => &r.id,
            ContentRecord::ConceptAnimation(r) => &r.id,
        }
    }

    /// The string per-subject output files are named after.
    pub fn file_stem(&self) -> &str {
        match self {
            ContentRecord::ShapeAnalogy(r) => &r.id,
            ContentRecord::TopicSummary(r) => &r.title,
            ContentRecord::ConceptAnimation(r) => &r.concept,
        }
    }

    /// Provider or fallback tag that produced the record.
    pub fn source_tag(&self) -> &str {
        match self {
            ContentRecord::ShapeAnalogy(r) => &r.model,
            ContentRecord::TopicSummary(r) => &r.source,
            ContentRecord::ConceptAnimation(r) => &r.model_used,
        }
    }

    pub fn as_shape_analogy(&self) -> Option<&ShapeAnalogy> {
        match self {
            ContentRecord::ShapeAnalogy(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_topic_summary(&self) -> Option<&TopicSummary> {
        match self {
            ContentRecord::TopicSummary(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_concept_animation(&self) -> Option<&ConceptAnimation> {
        match self {
            ContentRecord::ConceptAnimation(r) => Some(r),
            _ => None,
        }
    }

    /// Reject a record whose kind differs from `expected`.
    pub fn expect_kind(self, expected: RecordKind) -> Result<Self> {
        if self.kind() == expected {
            Ok(self)
        } else {
            Err(Error::validation_with_context(
                format!("expected a {} record, got {}", expected, self.kind()),
                ErrorContext::new().with_source("record"),
            ))
        }
    }
}

impl From<ShapeAnalogy> for ContentRecord {
    fn from(r: ShapeAnalogy) -> Self {
        ContentRecord::ShapeAnalogy(r)
    }
}

impl From<TopicSummary> for ContentRecord {
    fn from(r: TopicSummary) -> Self {
        ContentRecord::TopicSummary(r)
    }
}

impl From<ConceptAnimation> for ContentRecord {
    fn from(r: ConceptAnimation) -> Self {
        ContentRecord::ConceptAnimation(r)
    }
}

/// RFC 3339 UTC timestamp used for every `created_at` field.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_topic() -> TopicSummary {
        TopicSummary {
            id: "t-1".into(),
            title: "Photosynthesis".into(),
            description: "Plants convert light.".into(),
            page_url: "https://en.wikipedia.org/wiki/Photosynthesis".into(),
            image_url: "https://upload.example/leaf.jpg".into(),
            license: "CC BY-SA 4.0".into(),
            attribution: "Wikipedia/Wikimedia Commons".into(),
            learning_objectives: vec!["one".into()],
            difficulty_level: Audience::HighSchool,
            related_topics: vec!["Ecology".into()],
            created_at: timestamp_now(),
            source: "wikipedia".into(),
            image_quality: "high".into(),
            educational_value: 8,
        }
    }

    #[test]
    fn test_serializes_flat_without_tag() {
        let record = ContentRecord::from(sample_topic());
        let value = record.to_value().unwrap();
        assert_eq!(value["title"], "Photosynthesis");
        assert_eq!(value["difficulty_level"], "high_school");
        assert!(value.get("TopicSummary").is_none());
    }

    #[test]
    fn test_decode_by_kind() {
        let record = ContentRecord::from(sample_topic());
        let back = ContentRecord::decode(RecordKind::TopicSummary, record.to_value().unwrap()).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.file_stem(), "Photosynthesis");
        assert_eq!(back.source_tag(), "wikipedia");

        assert!(ContentRecord::decode(RecordKind::ConceptAnimation, record.to_value().unwrap()).is_err());
    }

    #[test]
    fn test_decode_rejects_value_outside_enum() {
        let mut value = ContentRecord::from(sample_topic()).to_value().unwrap();
        value["difficulty_level"] = json!("kindergarten");
        assert!(ContentRecord::decode(RecordKind::TopicSummary, value).is_err());
    }

    #[test]
    fn test_record_kind_names() {
        assert_eq!("concept-animation".parse::<RecordKind>().unwrap(), RecordKind::ConceptAnimation);
        assert_eq!(RecordKind::ShapeAnalogy.aggregate_file(), "analogies.json");
        assert!("poster".parse::<RecordKind>().is_err());
    }
}

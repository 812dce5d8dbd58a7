//! Batch execution over a local domain with controllable failures.

use async_trait::async_trait;
use edu_forge::batch::{default_item_delay, BatchRunner};
use edu_forge::cache::{CacheKey, TEXT_EXPIRY};
use edu_forge::config::PipelineConfig;
use edu_forge::pipeline::{ChainOutcome, ContentDomain, ContentPipeline};
use edu_forge::types::{timestamp_now, Audience, ContentRecord, MediaAsset, RecordKind, TopicSummary};
use edu_forge::{Error, Result};
use std::path::Path;
use std::time::Duration;

use crate::mock_server::offline_config;

/// `broken` fails in metadata synthesis, `invalid` produces a record the
/// schema rejects, anything else succeeds.
struct ScriptedTopics;

#[async_trait]
impl ContentDomain for ScriptedTopics {
    type Request = String;
    type Candidate = String;

    fn kind(&self) -> RecordKind {
        RecordKind::TopicSummary
    }

    fn subject<'r>(&self, request: &'r String) -> &'r str {
        request
    }

    fn cache_key(&self, request: &String) -> CacheKey {
        CacheKey::from_parts(&[request.as_str(), "scripted"])
    }

    fn cache_expiry(&self) -> Duration {
        TEXT_EXPIRY
    }

    fn media_dir(&self) -> &'static str {
        "images"
    }

    async fn fetch(&self, request: &String) -> ChainOutcome<String> {
        ChainOutcome {
            value: format!("About {}.", request),
            source: "scripted".into(),
            degraded: false,
            attempts: Vec::new(),
        }
    }

    fn media<'c>(&self, _candidate: &'c String) -> Vec<&'c MediaAsset> {
        Vec::new()
    }

    fn describe(
        &self,
        request: &String,
        outcome: &ChainOutcome<String>,
        _media_dir: &Path,
    ) -> Result<ContentRecord> {
        if request == "broken" {
            return Err(Error::validation("cannot describe 'broken'"));
        }
        Ok(TopicSummary {
            id: format!("id-{}", request),
            title: request.clone(),
            description: outcome.value.clone(),
            page_url: format!("https://en.wikipedia.org/wiki/{}", request),
            image_url: "generated_placeholder.png".into(),
            license: "CC BY-SA 4.0".into(),
            attribution: "Generated Educational Content".into(),
            learning_objectives: vec!["Explain it".into()],
            difficulty_level: Audience::HighSchool,
            related_topics: Vec::new(),
            created_at: timestamp_now(),
            source: outcome.source.clone(),
            image_quality: "generated".into(),
            educational_value: if request == "invalid" { 42 } else { 6 },
        }
        .into())
    }
}

fn pipeline(dir: &Path) -> ContentPipeline<ScriptedTopics> {
    ContentPipeline::from_config(ScriptedTopics, &offline_config(dir)).unwrap()
}

fn subjects(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_batch_execution_order_preserving() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(dir.path());
    let requests = subjects(&["Tides", "Volcanoes", "Photosynthesis"]);

    let result = BatchRunner::new(Duration::ZERO)
        .run(&pipeline, &requests)
        .await
        .unwrap();
    let titles: Vec<&str> = result.successes.iter().map(|p| p.record.file_stem()).collect();
    assert_eq!(titles, ["Tides", "Volcanoes", "Photosynthesis"]);
    assert_eq!(result.total_processed, 3);
    assert!((result.success_rate() - 1.0).abs() < f64::EPSILON);
    assert!(dir.path().join("output/packages/Volcanoes.json").exists());
}

#[tokio::test]
async fn test_batch_with_partial_failures() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(dir.path());
    let requests = subjects(&["Tides", "broken", "invalid", "Volcanoes"]);

    let result = BatchRunner::new(Duration::ZERO)
        .run(&pipeline, &requests)
        .await
        .unwrap();
    assert_eq!(result.success_count(), 2);
    assert_eq!(result.failure_count(), 2);
    assert!(!result.all_succeeded());

    assert_eq!(result.failures[0].index, 1);
    assert_eq!(result.failures[0].subject, "broken");
    assert_eq!(result.failures[1].index, 2);
    assert!(result.failures[1].message.contains("schema validation"));
    assert!(!dir.path().join("output/packages/invalid.json").exists());

    let aggregate = result.aggregate_path.unwrap();
    assert!(aggregate.ends_with("packages/educational_packages_batch.json"));
    let records: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(aggregate).unwrap()).unwrap();
    let titles: Vec<&str> = records.iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Tides", "Volcanoes"]);
}

#[tokio::test]
async fn test_empty_batch_writes_empty_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(dir.path());

    let result = BatchRunner::new(Duration::ZERO).run(&pipeline, &[]).await.unwrap();
    assert_eq!(result.total_processed, 0);
    let text = std::fs::read_to_string(result.aggregate_path.unwrap()).unwrap();
    assert_eq!(text.trim(), "[]");
}

#[tokio::test]
async fn test_delay_between_items() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(dir.path());
    let requests = subjects(&["A", "B", "C"]);

    let result = BatchRunner::new(Duration::from_millis(40))
        .run(&pipeline, &requests)
        .await
        .unwrap();
    assert!(result.execution_time >= Duration::from_millis(80));
}

#[test]
fn test_item_delay_per_kind() {
    assert_eq!(default_item_delay(RecordKind::ShapeAnalogy), Duration::from_secs(1));
    assert_eq!(default_item_delay(RecordKind::TopicSummary), Duration::from_secs(1));
    assert_eq!(default_item_delay(RecordKind::ConceptAnimation), Duration::from_secs(2));

    let runner = BatchRunner::for_kind(RecordKind::ConceptAnimation, &PipelineConfig::default());
    assert_eq!(runner.item_delay(), Duration::from_secs(2));
    let configured = PipelineConfig::default().with_item_delay(Duration::from_millis(250));
    assert_eq!(
        BatchRunner::for_kind(RecordKind::ShapeAnalogy, &configured).item_delay(),
        Duration::from_millis(250)
    );
}

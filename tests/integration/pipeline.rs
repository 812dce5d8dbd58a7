//! End-to-end runs with every provider unreachable or unconfigured.

use edu_forge::animations::{AnimationRequest, ConceptAnimationDomain};
use edu_forge::batch::BatchRunner;
use edu_forge::config::Credentials;
use edu_forge::pipeline::{ContentPipeline, RecordOrigin};
use edu_forge::schema::SchemaValidator;
use edu_forge::shapes::{ShapeAnalogyDomain, ShapeAnalogyPlanner};
use edu_forge::topics::{TopicRequest, TopicSummaryDomain};
use edu_forge::types::{Complexity, RecordKind};
use edu_forge::Error;
use std::path::Path;

use crate::mock_server::offline_config;

fn assert_schema_valid(kind: RecordKind, path: &Path) {
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    let validator = SchemaValidator::for_kind(kind).unwrap();
    assert!(validator.validate(&value).is_ok(), "{} is not a valid {}", path.display(), kind);
}

#[tokio::test]
async fn test_topic_falls_back_then_hits_cache() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    config.prepare_dirs().unwrap();
    let domain = TopicSummaryDomain::new(&config, &Credentials::none()).unwrap();
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();
    let request = TopicRequest::new("Photosynthesis").unwrap();

    let first = pipeline.run(&request).await.unwrap();
    assert_eq!(first.origin, RecordOrigin::Fallback("generated".into()));
    let topic = first.record.as_topic_summary().unwrap();
    assert_eq!(topic.source, "generated");
    assert_eq!(topic.image_quality, "generated");
    assert_eq!(topic.attribution, "Generated Educational Content");
    assert_eq!(topic.educational_value, 8);
    assert!(!topic.learning_objectives.is_empty());
    assert!(topic.image_url.ends_with("Photosynthesis_diagram.txt"));
    assert!(Path::new(&topic.image_url).exists());

    let saved = config.output_dir.join("packages").join("Photosynthesis.json");
    assert_schema_valid(RecordKind::TopicSummary, &saved);

    let second = pipeline.process(&request).await.unwrap();
    assert_eq!(second.origin, RecordOrigin::Cache);
    assert!(second.attempts.is_empty());
    assert_eq!(second.record, first.record);
}

#[tokio::test]
async fn test_disabled_cache_regenerates() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path()).with_cache_enabled(false);
    let domain = TopicSummaryDomain::new(&config, &Credentials::none()).unwrap();
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();
    let request = TopicRequest::new("Tides").unwrap();

    let first = pipeline.process(&request).await.unwrap();
    let second = pipeline.process(&request).await.unwrap();
    assert!(second.origin.is_degraded());
    assert_ne!(first.record.id(), second.record.id());
    assert!(!dir.path().join("cache").exists());
}

#[tokio::test]
async fn test_offline_shapes_batch() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let domain = ShapeAnalogyDomain::new(&config, &Credentials::none(), true).unwrap();
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();
    let requests = ShapeAnalogyPlanner::seeded(42)
        .plan(3, Complexity::Beginner)
        .unwrap();

    let result = BatchRunner::for_kind(RecordKind::ShapeAnalogy, &config)
        .run(&pipeline, &requests)
        .await
        .unwrap();
    assert!(result.all_succeeded());
    assert_eq!(result.degraded_count(), 3);

    let ids: Vec<&str> = result.successes.iter().map(|p| p.record.id()).collect();
    assert_eq!(ids, ["analogy_001", "analogy_002", "analogy_003"]);
    for processed in &result.successes {
        let analogy = processed.record.as_shape_analogy().unwrap();
        assert_eq!(analogy.model, "offline-demo-mode");
        assert_eq!(analogy.tricky_questions.len(), 3);
        assert_ne!(analogy.shape_a, analogy.shape_b);
        let image = std::fs::read_to_string(&analogy.image_url).unwrap();
        assert!(image.starts_with("MOCK IMAGE: "));
    }

    let aggregate = result.aggregate_path.unwrap();
    assert_eq!(aggregate, config.output_dir.join("analogies.json"));
    let records: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&aggregate).unwrap()).unwrap();
    assert_eq!(records.len(), 3);
    assert_schema_valid(RecordKind::ShapeAnalogy, &config.output_dir.join("analogy_002.json"));
}

#[test]
fn test_online_shapes_need_token() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let err = ShapeAnalogyDomain::new(&config, &Credentials::none(), false)
        .err()
        .unwrap();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[tokio::test]
async fn test_animation_rendered_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let domain = ConceptAnimationDomain::new(&config, &Credentials::none()).unwrap();
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();
    let request = AnimationRequest::new("Sine Wave", 8).unwrap();

    let processed = pipeline.run(&request).await.unwrap();
    assert_eq!(processed.origin, RecordOrigin::Fallback("rendered_fallback".into()));
    let animation = processed.record.as_concept_animation().unwrap();
    assert_eq!(animation.model_used, "rendered_fallback");
    assert_eq!(animation.duration, 8);
    assert!(animation.animation_path.ends_with("Sine_Wave_fallback.gif"));
    assert!(animation.animation_path.contains("animations"));

    let bytes = std::fs::read(&animation.animation_path).unwrap();
    assert_eq!(bytes.len() as u64, animation.file_size);
    assert_eq!(&bytes[..6], b"GIF89a");
    assert_schema_valid(
        RecordKind::ConceptAnimation,
        &config.output_dir.join("metadata").join("Sine_Wave.json"),
    );
}

#[tokio::test]
async fn test_animation_text_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let domain = ConceptAnimationDomain::new(&config, &Credentials::none())
        .unwrap()
        .with_rendered_fallback(false);
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();
    let request = AnimationRequest::new("Sine Wave", 8).unwrap();

    let processed = pipeline.run(&request).await.unwrap();
    assert_eq!(processed.origin, RecordOrigin::Fallback("text_fallback".into()));
    let animation = processed.record.as_concept_animation().unwrap();
    assert_eq!(animation.model_used, "text_fallback");
    assert!(animation.animation_path.ends_with("Sine_Wave_text_animation.txt"));

    let on_disk = std::fs::metadata(&animation.animation_path).unwrap();
    assert_eq!(on_disk.len(), animation.file_size);
    assert_schema_valid(
        RecordKind::ConceptAnimation,
        &config.output_dir.join("metadata").join("Sine_Wave.json"),
    );
}

#[tokio::test]
async fn test_repeated_pairs_keep_their_own_ids_and_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let domain = ShapeAnalogyDomain::new(&config, &Credentials::none(), true).unwrap();
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();
    let requests = ShapeAnalogyPlanner::seeded(42)
        .plan(40, Complexity::Beginner)
        .unwrap();

    let result = BatchRunner::for_kind(RecordKind::ShapeAnalogy, &config)
        .run(&pipeline, &requests)
        .await
        .unwrap();
    assert_eq!(result.success_count(), 40);
    // Five beginner shapes and ten relationships: some pairs repeat.
    assert!(result
        .successes
        .iter()
        .any(|p| p.origin == RecordOrigin::Cache));

    for (request, processed) in requests.iter().zip(&result.successes) {
        let analogy = processed.record.as_shape_analogy().unwrap();
        assert_eq!(analogy.id, request.id);
        assert_eq!(analogy.seed, request.seed);
        assert!(analogy.image_url.ends_with(&format!("{}.txt", request.id)));
        assert!(Path::new(&analogy.image_url).exists(), "{}", analogy.image_url);
        let saved = config.output_dir.join(format!("{}.json", request.id));
        assert!(saved.exists(), "{} missing", saved.display());
    }

    let records: Vec<serde_json::Value> = serde_json::from_str(
        &std::fs::read_to_string(result.aggregate_path.unwrap()).unwrap(),
    )
    .unwrap();
    let mut ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 40);
}

#[tokio::test]
async fn test_cache_hit_takes_requested_spelling() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let domain = TopicSummaryDomain::new(&config, &Credentials::none()).unwrap();
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();

    pipeline.run(&TopicRequest::new("Solar System").unwrap()).await.unwrap();
    let second = pipeline.run(&TopicRequest::new("solar system").unwrap()).await.unwrap();
    assert_eq!(second.origin, RecordOrigin::Cache);
    assert_eq!(second.record.as_topic_summary().unwrap().title, "solar system");

    let packages = config.output_dir.join("packages");
    assert!(packages.join("Solar_System.json").exists());
    assert!(packages.join("solar_system.json").exists());
}

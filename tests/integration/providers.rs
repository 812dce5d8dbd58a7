//! Provider chains against mocked remote APIs.

use edu_forge::animations::{AnimationRequest, ConceptAnimationDomain};
use edu_forge::config::Credentials;
use edu_forge::pipeline::{AttemptOutcome, ContentPipeline, RecordOrigin};
use edu_forge::providers::DEFAULT_IMAGE_MODEL;
use edu_forge::shapes::{ShapeAnalogyDomain, ShapeAnalogyPlanner};
use edu_forge::topics::{TopicRequest, TopicSummaryDomain};
use edu_forge::types::Complexity;

use crate::mock_server::MockServerFixture;

const SEARCH_PHOTOSYNTHESIS: &str = r#"{"query":{"search":[{"title":"Photosynthesis"}]}}"#;

#[tokio::test]
async fn test_topic_from_wikipedia_with_page_image() {
    let mut fixture = MockServerFixture::new().await;
    let _search = fixture
        .mock_json_query("/w/api.php", "list", "search", SEARCH_PHOTOSYNTHESIS)
        .await;
    let _page = fixture
        .mock_json_query(
            "/w/api.php",
            "titles",
            "Photosynthesis",
            r#"{"query":{"pages":{"1":{"extract":"Photosynthesis converts light into chemical energy.",
            "fullurl":"https://en.wikipedia.org/wiki/Photosynthesis",
            "thumbnail":{"source":"https://upload.example/leaf_800.png"}}}}}"#,
        )
        .await;
    let config = fixture.config();
    let domain = TopicSummaryDomain::new(&config, &Credentials::none()).unwrap();
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();

    let processed = pipeline
        .run(&TopicRequest::new("Photosynthesis").unwrap())
        .await
        .unwrap();
    assert_eq!(processed.origin, RecordOrigin::Provider("wikipedia".into()));
    let topic = processed.record.as_topic_summary().unwrap();
    assert_eq!(topic.description, "Photosynthesis converts light into chemical energy.");
    assert_eq!(topic.image_url, "https://upload.example/leaf_800.png");
    assert_eq!(topic.attribution, "Wikipedia/Wikimedia Commons");
    assert_eq!(topic.image_quality, "high");
    assert_eq!(topic.license, "CC BY-SA 4.0");
    assert!(!fixture.output_dir().join("images").exists());
}

#[tokio::test]
async fn test_topic_image_from_unsplash_when_article_has_none() {
    let mut fixture = MockServerFixture::new().await;
    let _search = fixture
        .mock_json_query("/w/api.php", "list", "search", SEARCH_PHOTOSYNTHESIS)
        .await;
    let _page = fixture
        .mock_json_query(
            "/w/api.php",
            "titles",
            "Photosynthesis",
            r#"{"query":{"pages":{"1":{"extract":"Plants make sugar."}}}}"#,
        )
        .await;
    let _commons = fixture
        .mock_json("GET", "/commons/w/api.php", 200, r#"{"query":{"search":[]}}"#)
        .await;
    let unsplash = fixture
        .mock_json(
            "GET",
            "/search/photos",
            200,
            r#"{"results":[{"urls":{"regular":"https://images.unsplash.example/leaf.jpg"}}]}"#,
        )
        .await;
    let config = fixture.config();
    let credentials = Credentials {
        unsplash: Some("unsplash-key".into()),
        ..Credentials::none()
    };
    let domain = TopicSummaryDomain::new(&config, &credentials).unwrap();
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();

    let processed = pipeline
        .process(&TopicRequest::new("Photosynthesis").unwrap())
        .await
        .unwrap();
    unsplash.assert_async().await;
    let topic = processed.record.as_topic_summary().unwrap();
    assert_eq!(topic.source, "wikipedia");
    assert_eq!(topic.image_url, "https://images.unsplash.example/leaf.jpg");
    assert_eq!(topic.attribution, "Photo via Unsplash");
    assert_eq!(topic.image_quality, "high");
    assert!(topic.page_url.ends_with("/wiki/Photosynthesis"));
}

#[tokio::test]
async fn test_shape_image_from_huggingface() {
    let mut fixture = MockServerFixture::new().await;
    let png = b"\x89PNG\r\n\x1a\nfake";
    let _image = fixture
        .mock_bytes(
            "POST",
            &format!("/models/{}", DEFAULT_IMAGE_MODEL),
            "image/png",
            png,
        )
        .await;
    let config = fixture.config();
    let credentials = Credentials {
        huggingface_image: Some("hf_test".into()),
        ..Credentials::none()
    };
    let domain = ShapeAnalogyDomain::new(&config, &credentials, false).unwrap();
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();
    let requests = ShapeAnalogyPlanner::seeded(3)
        .plan(1, Complexity::Intermediate)
        .unwrap();

    let processed = pipeline.run(&requests[0]).await.unwrap();
    assert_eq!(processed.origin, RecordOrigin::Provider(DEFAULT_IMAGE_MODEL.into()));
    let analogy = processed.record.as_shape_analogy().unwrap();
    assert_eq!(analogy.model, DEFAULT_IMAGE_MODEL);
    assert!(analogy.image_url.ends_with("analogy_001.png"));
    assert_eq!(std::fs::read(&analogy.image_url).unwrap(), png);
}

#[tokio::test]
async fn test_animation_from_replicate_prediction() {
    let mut fixture = MockServerFixture::new().await;
    let video = b"not really an mp4";
    let _submit = fixture
        .mock_json("POST", "/predictions", 201, r#"{"id":"p-17","status":"starting"}"#)
        .await;
    let done = format!(
        r#"{{"id":"p-17","status":"succeeded","output":["{}"]}}"#,
        fixture.url("/files/p-17.mp4")
    );
    let _poll = fixture.mock_json("GET", "/predictions/p-17", 200, &done).await;
    let _file = fixture
        .mock_bytes("GET", "/files/p-17.mp4", "video/mp4", video)
        .await;
    let config = fixture.config();
    let credentials = Credentials {
        replicate: Some("r8_test".into()),
        ..Credentials::none()
    };
    let domain = ConceptAnimationDomain::new(&config, &credentials).unwrap();
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();

    let processed = pipeline
        .run(&AnimationRequest::new("Photosynthesis", 10).unwrap())
        .await
        .unwrap();
    assert_eq!(processed.origin, RecordOrigin::Provider("replicate".into()));
    let animation = processed.record.as_concept_animation().unwrap();
    assert_eq!(animation.model_used, "replicate");
    assert_eq!(animation.file_size, video.len() as u64);
    assert!(animation.animation_path.contains("Photosynthesis_replicate_"));
    assert_eq!(std::fs::read(&animation.animation_path).unwrap(), video);
}

#[tokio::test]
async fn test_animation_moves_on_after_retryable_failures() {
    let mut fixture = MockServerFixture::new().await;
    let _replicate = fixture
        .mock_json("POST", "/predictions", 503, r#"{"detail":"overloaded"}"#)
        .await;
    let body = format!(r#"{{"video_url":"{}"}}"#, fixture.url("/files/s.mp4"));
    let _stability = fixture.mock_json("POST", "/video/generate", 200, &body).await;
    let _file = fixture
        .mock_bytes("GET", "/files/s.mp4", "video/mp4", b"stability video")
        .await;
    let config = fixture.config();
    let credentials = Credentials {
        replicate: Some("r8_test".into()),
        stability: Some("sk-test".into()),
        ..Credentials::none()
    };
    let domain = ConceptAnimationDomain::new(&config, &credentials).unwrap();
    let pipeline = ContentPipeline::from_config(domain, &config).unwrap();

    let processed = pipeline
        .process(&AnimationRequest::new("Sine wave", 8).unwrap())
        .await
        .unwrap();
    assert_eq!(processed.origin, RecordOrigin::Provider("stability".into()));

    let replicate_attempt = processed
        .attempts
        .iter()
        .find(|a| a.provider == "replicate")
        .unwrap();
    assert_eq!(replicate_attempt.tries, 3);
    assert!(matches!(replicate_attempt.outcome, AttemptOutcome::Failed(_)));
    assert!(processed
        .attempts
        .iter()
        .any(|a| a.outcome == AttemptOutcome::Skipped));
}

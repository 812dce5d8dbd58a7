//! Benchmarks for the per-record work between provider and disk
//!
//! This benchmark measures:
//! - Schema compilation
//! - Validation of valid and invalid records
//! - Cache key derivation
//! - Cache round trip through the file backend

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use edu_forge::cache::{CacheConfig, CacheKey, CacheManager, FileCache, TEXT_EXPIRY};
use edu_forge::schema::SchemaValidator;
use edu_forge::types::RecordKind;
use serde_json::{json, Value};

fn topic_record(objectives: usize) -> Value {
    json!({
        "id": "4f0c1c8e-2a7e-4a53-9d0b-0d7b1f7d3c21",
        "title": "Photosynthesis",
        "description": "Photosynthesis is a biological process by which photosynthetic organisms convert light energy into chemical energy.",
        "page_url": "https://en.wikipedia.org/wiki/Photosynthesis",
        "image_url": "https://upload.wikimedia.org/leaf.png",
        "license": "CC BY-SA 4.0",
        "attribution": "Wikipedia/Wikimedia Commons",
        "learning_objectives": (0..objectives).map(|i| format!("Objective {}", i)).collect::<Vec<_>>(),
        "difficulty_level": "high_school",
        "related_topics": ["Chlorophyll", "Carbon cycle"],
        "created_at": "2024-05-01T12:00:00+00:00",
        "source": "wikipedia",
        "image_quality": "high",
        "educational_value": 8
    })
}

fn bench_schema_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_compile");
    for kind in RecordKind::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, kind| {
            b.iter(|| SchemaValidator::for_kind(black_box(*kind)).unwrap())
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let validator = SchemaValidator::for_kind(RecordKind::TopicSummary).unwrap();
    let mut group = c.benchmark_group("validate_topic");

    for objectives in [4, 64] {
        let record = topic_record(objectives);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("valid", objectives), &record, |b, record| {
            b.iter(|| validator.validate(black_box(record)).is_ok())
        });
    }

    let mut invalid = topic_record(4);
    invalid["difficulty_level"] = json!("kindergarten");
    invalid["educational_value"] = json!(42);
    group.bench_function("invalid_collect_errors", |b| {
        b.iter(|| validator.validate(black_box(&invalid)).unwrap_err().len())
    });
    group.bench_function("invalid_is_valid", |b| {
        b.iter(|| validator.is_valid(black_box(&invalid)))
    });
    group.finish();
}

fn bench_cache_key(c: &mut Criterion) {
    c.bench_function("cache_key_from_parts", |b| {
        b.iter(|| {
            CacheKey::from_parts(black_box(&["Triangle", "Square", "interior angles", "beginner"]))
        })
    });
}

fn bench_cache_round_trip(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(
        CacheConfig::new().with_expiry(TEXT_EXPIRY),
        Box::new(FileCache::new(dir.path())),
    );
    let record = topic_record(4);
    let key = CacheKey::from_parts(&["photosynthesis", "content"]);

    c.bench_function("file_cache_put_get", |b| {
        b.to_async(&runtime).iter(|| async {
            cache.put(&key, &record).await;
            cache.get::<Value>(&key).await
        })
    });
}

criterion_group!(
    benches,
    bench_schema_compile,
    bench_validate,
    bench_cache_key,
    bench_cache_round_trip
);
criterion_main!(benches);

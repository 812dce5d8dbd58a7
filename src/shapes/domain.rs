use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::catalog::{Relationship, Shape};
use crate::cache::{CacheKey, MEDIA_EXPIRY};
use crate::config::{Credentials, PipelineConfig};
use crate::pipeline::{ChainOutcome, ContentDomain, ProviderChain, Restamped};
use crate::providers::placeholder::{self, OFFLINE_MODEL};
use crate::providers::{GeneratedMedia, HuggingFaceImage, ImagePrompt};
use crate::transport::HttpTransport;
use crate::types::{timestamp_now, Complexity, ContentRecord, MediaAsset, RecordKind, ShapeAnalogy};
use crate::{Error, ErrorContext, Result};

/// One planned analogy.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeAnalogyRequest {
    /// `analogy_NNN`, 1-based.
    pub id: String,
    pub shape_a: Shape,
    pub shape_b: Shape,
    pub relationship: Relationship,
    pub complexity: Complexity,
    /// Image generation seed, 1000..=9999.
    pub seed: u32,
}

impl ShapeAnalogyRequest {
    pub fn new(
        index: usize,
        shape_a: Shape,
        shape_b: Shape,
        relationship: Relationship,
        complexity: Complexity,
        seed: u32,
    ) -> Result<Self> {
        if index == 0 {
            return Err(Error::validation_with_context(
                "analogy numbering starts at 1",
                ErrorContext::new().with_field_path("index"),
            ));
        }
        if shape_a == shape_b {
            return Err(Error::validation_with_context(
                format!("analogy needs two distinct shapes, got {} twice", shape_a.name),
                ErrorContext::new().with_field_path("shape_b"),
            ));
        }
        if !(1000..=9999).contains(&seed) {
            return Err(Error::validation_with_context(
                format!("seed {} outside 1000..=9999", seed),
                ErrorContext::new().with_field_path("seed"),
            ));
        }
        Ok(Self {
            id: format!("analogy_{:03}", index),
            shape_a,
            shape_b,
            relationship,
            complexity,
            seed,
        })
    }

    pub fn prompt(&self) -> Result<String> {
        self.relationship.prompt(&self.shape_a, &self.shape_b)
    }

    pub fn visual_prompt(&self) -> Result<String> {
        self.relationship.visual_prompt(&self.shape_a, &self.shape_b)
    }
}

/// Shape analogies illustrated by text-to-image, or by a mock image text
/// file in offline mode.
pub struct ShapeAnalogyDomain {
    chain: ProviderChain<ImagePrompt, GeneratedMedia>,
}

impl ShapeAnalogyDomain {
    /// Online mode requires `HF_API_TOKEN`; offline mode never calls out.
    pub fn new(config: &PipelineConfig, credentials: &Credentials, offline: bool) -> Result<Self> {
        let chain = ProviderChain::new(config.retry.to_policy());
        if offline {
            return Ok(Self { chain });
        }
        if credentials.huggingface_image.is_none() {
            return Err(Error::configuration_with_context(
                "HF_API_TOKEN is required unless running offline",
                ErrorContext::new()
                    .with_field_path("HF_API_TOKEN")
                    .with_source("shapes"),
            ));
        }
        let transport = HttpTransport::new(&config.http)?;
        Ok(Self {
            chain: chain.with_provider(HuggingFaceImage::new(transport, config, credentials)),
        })
    }

    pub fn is_offline(&self) -> bool {
        self.chain.is_empty()
    }
}

#[async_trait]
impl ContentDomain for ShapeAnalogyDomain {
    type Request = ShapeAnalogyRequest;
    type Candidate = GeneratedMedia;

    fn kind(&self) -> RecordKind {
        RecordKind::ShapeAnalogy
    }

    fn subject<'r>(&self, request: &'r ShapeAnalogyRequest) -> &'r str {
        &request.id
    }

    fn cache_key(&self, request: &ShapeAnalogyRequest) -> CacheKey {
        CacheKey::from_parts(&[
            request.shape_a.name,
            request.shape_b.name,
            request.relationship.as_str(),
            request.complexity.as_str(),
        ])
    }

    fn cache_expiry(&self) -> Duration {
        MEDIA_EXPIRY
    }

    fn media_dir(&self) -> &'static str {
        "images"
    }

    async fn fetch(&self, request: &ShapeAnalogyRequest) -> ChainOutcome<GeneratedMedia> {
        // Templates only fail for n < 3, which the shape tables never contain.
        let prompt = request
            .visual_prompt()
            .unwrap_or_else(|_| request.relationship.as_str().to_string());
        let job = ImagePrompt {
            prompt,
            file_stem: request.id.clone(),
        };
        self.chain
            .run(&job, OFFLINE_MODEL, |job| GeneratedMedia {
                asset: placeholder::mock_image(&job.prompt, &job.file_stem),
                model: OFFLINE_MODEL.to_string(),
            })
            .await
    }

    fn media<'c>(&self, candidate: &'c GeneratedMedia) -> Vec<&'c MediaAsset> {
        vec![&candidate.asset]
    }

    fn describe(
        &self,
        request: &ShapeAnalogyRequest,
        outcome: &ChainOutcome<GeneratedMedia>,
        media_dir: &Path,
    ) -> Result<ContentRecord> {
        Ok(ShapeAnalogy {
            id: request.id.clone(),
            prompt: request.prompt()?,
            model: outcome.value.model.clone(),
            seed: request.seed,
            created_at: timestamp_now(),
            image_url: outcome.value.asset.reference(media_dir),
            complexity_level: request.complexity,
            estimated_time_minutes: request.complexity.estimated_minutes(),
            tricky_questions: request
                .relationship
                .tricky_questions(&request.shape_a, &request.shape_b)
                .to_vec(),
            shape_a: request.shape_a.name.to_string(),
            shape_b: request.shape_b.name.to_string(),
            relationship: request.relationship.as_str().to_string(),
        }
        .into())
    }

    /// Cached analogies are shared by every request for the same pair, so a
    /// hit takes this request's id, seed and timestamp, and its image is
    /// copied under the new id.
    fn restamp(&self, request: &ShapeAnalogyRequest, cached: ContentRecord, media_dir: &Path) -> Restamped {
        let mut analogy = match cached {
            ContentRecord::ShapeAnalogy(analogy) if analogy.id != request.id => analogy,
            other => return Restamped::unchanged(other),
        };
        let mut copies = Vec::new();
        if !is_url(&analogy.image_url) {
            let old = PathBuf::from(&analogy.image_url);
            let file_name = match old.extension().and_then(|e| e.to_str()) {
                Some(ext) => format!("{}.{}", request.id, ext),
                None => request.id.clone(),
            };
            let new = media_dir.join(file_name);
            analogy.image_url = new.display().to_string();
            copies.push((old, new));
        }
        analogy.id = request.id.clone();
        analogy.seed = request.seed;
        analogy.created_at = timestamp_now();
        Restamped {
            record: analogy.into(),
            copies,
        }
    }
}

fn is_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use super::catalog::concept_profile;
use super::render::{rendered_animation, RENDERED_ANIMATION};
use crate::cache::{CacheKey, MEDIA_EXPIRY};
use crate::catalog::{normalize_key, require_subject};
use crate::config::{Credentials, PipelineConfig};
use crate::pipeline::{ChainOutcome, ContentDomain, ProviderChain, Restamped};
use crate::providers::placeholder::{self, TEXT_ANIMATION};
use crate::providers::{GeneratedMedia, HuggingFaceVideo, ReplicateVideo, StabilityVideo, VideoPrompt};
use crate::transport::HttpTransport;
use crate::types::{
    timestamp_now, AnimationType, Audience, ConceptAnimation, ContentRecord, MediaAsset, RecordKind,
};
use crate::{Error, ErrorContext, Result};

pub const MIN_DURATION: u32 = 5;
pub const MAX_DURATION: u32 = 15;
pub const DEFAULT_DURATION: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationRequest {
    pub concept: String,
    pub duration_secs: u32,
    pub audience: Audience,
    pub animation_type: AnimationType,
    pub quality: String,
    pub resolution: String,
}

impl AnimationRequest {
    /// High-school audience, GIF, `high` quality at `720p`.
    pub fn new(concept: &str, duration_secs: u32) -> Result<Self> {
        let concept = require_subject("concept", concept)?;
        if !(MIN_DURATION..=MAX_DURATION).contains(&duration_secs) {
            return Err(Error::validation_with_context(
                format!(
                    "duration must be between {} and {} seconds, got {}",
                    MIN_DURATION, MAX_DURATION, duration_secs
                ),
                ErrorContext::new().with_field_path("duration"),
            ));
        }
        Ok(Self {
            concept,
            duration_secs,
            audience: Audience::HighSchool,
            animation_type: AnimationType::Gif,
            quality: "high".to_string(),
            resolution: "720p".to_string(),
        })
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_animation_type(mut self, animation_type: AnimationType) -> Self {
        self.animation_type = animation_type;
        self
    }
}

/// Concept animations from text-to-video services, then a locally drawn
/// GIF, ending in a text description of the animation.
pub struct ConceptAnimationDomain {
    chain: ProviderChain<VideoPrompt, GeneratedMedia>,
    render_fallback: bool,
}

impl ConceptAnimationDomain {
    pub fn new(config: &PipelineConfig, credentials: &Credentials) -> Result<Self> {
        let transport = HttpTransport::new(&config.http)?;
        let chain = ProviderChain::new(config.retry.to_policy())
            .with_provider(HuggingFaceVideo::new(transport.clone(), config, credentials))
            .with_provider(ReplicateVideo::new(transport.clone(), config, credentials))
            .with_provider(StabilityVideo::new(transport, config, credentials));
        Ok(Self {
            chain,
            render_fallback: true,
        })
    }

    /// With `false` the local fallback skips drawing and writes the text
    /// description directly.
    pub fn with_rendered_fallback(mut self, enabled: bool) -> Self {
        self.render_fallback = enabled;
        self
    }

    pub fn providers(&self) -> Vec<&str> {
        self.chain.tags()
    }

    fn local_animation(&self, job: &VideoPrompt) -> GeneratedMedia {
        if self.render_fallback {
            match rendered_animation(&job.concept, job.duration_secs) {
                Ok(asset) => {
                    return GeneratedMedia {
                        asset,
                        model: RENDERED_ANIMATION.to_string(),
                    }
                }
                Err(e) => warn!(concept = %job.concept, error = %e, "rendering failed, writing text animation"),
            }
        }
        GeneratedMedia {
            asset: placeholder::text_animation(&job.concept, job.duration_secs),
            model: TEXT_ANIMATION.to_string(),
        }
    }
}

#[async_trait]
impl ContentDomain for ConceptAnimationDomain {
    type Request = AnimationRequest;
    type Candidate = GeneratedMedia;

    fn kind(&self) -> RecordKind {
        RecordKind::ConceptAnimation
    }

    fn subject<'r>(&self, request: &'r AnimationRequest) -> &'r str {
        &request.concept
    }

    fn cache_key(&self, request: &AnimationRequest) -> CacheKey {
        CacheKey::from_parts(&[
            normalize_key(&request.concept).as_str(),
            request.duration_secs.to_string().as_str(),
            request.audience.as_str(),
        ])
    }

    fn cache_expiry(&self) -> Duration {
        MEDIA_EXPIRY
    }

    fn media_dir(&self) -> &'static str {
        "animations"
    }

    async fn fetch(&self, request: &AnimationRequest) -> ChainOutcome<GeneratedMedia> {
        let profile = concept_profile(&request.concept);
        if !profile.suggested_durations.contains(&request.duration_secs) {
            debug!(
                concept = %request.concept,
                duration = request.duration_secs,
                suggested = ?profile.suggested_durations,
                "duration outside the suggested range"
            );
        }
        let job = VideoPrompt {
            concept: request.concept.clone(),
            prompt: profile.animation_prompt,
            duration_secs: request.duration_secs,
        };
        let fallback_tag = if self.render_fallback { RENDERED_ANIMATION } else { TEXT_ANIMATION };
        let mut outcome = self
            .chain
            .run(&job, fallback_tag, |job| self.local_animation(job))
            .await;
        if outcome.degraded {
            outcome.source = outcome.value.model.clone();
        }
        outcome
    }

    fn media<'c>(&self, candidate: &'c GeneratedMedia) -> Vec<&'c MediaAsset> {
        vec![&candidate.asset]
    }

    fn describe(
        &self,
        request: &AnimationRequest,
        outcome: &ChainOutcome<GeneratedMedia>,
        media_dir: &Path,
    ) -> Result<ContentRecord> {
        let profile = concept_profile(&request.concept);
        let educational_value = profile.educational_value();
        Ok(ConceptAnimation {
            id: uuid::Uuid::new_v4().to_string(),
            concept: request.concept.clone(),
            animation_path: outcome.value.asset.reference(media_dir),
            duration: request.duration_secs,
            target_audience: request.audience,
            animation_type: request.animation_type,
            model_used: outcome.value.model.clone(),
            created_at: timestamp_now(),
            file_size: outcome.value.asset.size(),
            resolution: request.resolution.clone(),
            quality: request.quality.clone(),
            learning_goals: profile.learning_goals,
            key_learning_points: profile.key_learning_points,
            tricky_questions: profile.tricky_questions,
            educational_value,
        }
        .into())
    }

    /// Keys are normalised, so a hit may carry another spelling of the
    /// concept; the record takes this request's.
    fn restamp(&self, request: &AnimationRequest, cached: ContentRecord, _media_dir: &Path) -> Restamped {
        match cached {
            ContentRecord::ConceptAnimation(mut animation) => {
                animation.concept = request.concept.clone();
                Restamped::unchanged(animation.into())
            }
            other => Restamped::unchanged(other),
        }
    }
}

//! 内容提供方模块：外部生成/百科/图库 API 与本地占位内容。
//!
//! # Content Providers
//!
//! Every external API is a [`Provider`]: it reports whether it has the
//! credential it needs and makes a single attempt. Retrying and ordering
//! are handled by [`crate::pipeline::ProviderChain`].
//!
//! | Provider | Tag | Credential | Produces |
//! |----------|-----|------------|----------|
//! | [`HuggingFaceImage`] | `runwayml/stable-diffusion-v1-5` | `HF_API_TOKEN` | PNG bytes |
//! | [`HuggingFaceVideo`] | `huggingface` | `HF_API_KEY` | video bytes |
//! | [`ReplicateVideo`] | `replicate` | `REPLICATE_API_KEY` | video bytes |
//! | [`StabilityVideo`] | `stability` | `STABILITY_API_KEY` | video bytes |
//! | [`WikipediaArticles`] | `wikipedia` | none | article + image URL |
//! | [`UnsplashImages`] | `unsplash` | `UNSPLASH_ACCESS_KEY` | image URL |
//! | [`PexelsImages`] | `pexels` | `PEXELS_API_KEY` | image URL |
//!
//! The [`placeholder`] functions build the local fallback content.

mod huggingface;
pub mod placeholder;
mod polling;
mod replicate;
mod stability;
mod stock;
mod wikipedia;

pub use huggingface::{HuggingFaceImage, HuggingFaceVideo, DEFAULT_IMAGE_MODEL, VIDEO_MODELS};
pub use polling::{JobState, Poller};
pub use replicate::ReplicateVideo;
pub use stability::StabilityVideo;
pub use stock::{PexelsImages, UnsplashImages};
pub use wikipedia::WikipediaArticles;

use async_trait::async_trait;

use crate::types::MediaAsset;
use crate::Result;

/// One external source of content for requests of type `R`.
#[async_trait]
pub trait Provider<R, C>: Send + Sync
where
    R: Send + Sync,
{
    /// Identifier recorded in the output (`model` / `source` / `model_used`).
    fn tag(&self) -> &str;

    /// `false` when a required credential is missing; the chain then skips
    /// the provider without calling it.
    fn is_configured(&self) -> bool;

    /// A single attempt. Retryable failures are reported through
    /// [`crate::Error::is_retryable`].
    async fn attempt(&self, request: &R) -> Result<C>;
}

/// Text-to-image job for one shape analogy.
#[derive(Debug, Clone)]
pub struct ImagePrompt {
    pub prompt: String,
    /// File name stem of the generated image (`analogy_001`).
    pub file_stem: String,
}

/// Text-to-video job for one concept.
#[derive(Debug, Clone)]
pub struct VideoPrompt {
    pub concept: String,
    pub prompt: String,
    pub duration_secs: u32,
}

impl VideoPrompt {
    /// Prompt text sent to every video provider.
    pub fn full_prompt(&self) -> String {
        format!(
            "{}, duration {} seconds, educational content",
            self.prompt, self.duration_secs
        )
    }

    /// File name for downloaded media: `<concept>_<source>_<unix secs>.mp4`.
    pub fn file_name(&self, source: &str) -> String {
        format!(
            "{}_{}_{}.mp4",
            self.concept.trim().replace(' ', "_"),
            source,
            chrono::Utc::now().timestamp()
        )
    }
}

/// Free-text topic used for article and image searches.
#[derive(Debug, Clone)]
pub struct TopicQuery {
    pub topic: String,
}

/// Generated image or video plus the model that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedMedia {
    pub asset: MediaAsset,
    pub model: String,
}

/// Encyclopedia article summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub description: String,
    pub page_url: String,
    pub image_url: Option<String>,
    pub license: String,
}

/// Illustration for a topic that has no article image.
#[derive(Debug, Clone)]
pub struct Illustration {
    pub asset: MediaAsset,
    pub attribution: String,
    pub quality: String,
}

pub(crate) const DEFAULT_LICENSE: &str = "CC BY-SA 4.0";

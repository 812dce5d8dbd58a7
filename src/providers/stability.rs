use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::{GeneratedMedia, Provider, VideoPrompt};
use crate::config::{Credentials, PipelineConfig};
use crate::transport::{Auth, HttpTransport};
use crate::types::MediaAsset;
use crate::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Stability AI video endpoint; answers synchronously with a `video_url`.
pub struct StabilityVideo {
    transport: HttpTransport,
    base_url: String,
    api_key: Option<String>,
}

impl StabilityVideo {
    pub const TAG: &'static str = "stability";

    pub fn new(transport: HttpTransport, config: &PipelineConfig, credentials: &Credentials) -> Self {
        Self {
            transport,
            base_url: config.endpoints.stability.trim_end_matches('/').to_string(),
            api_key: credentials.stability.clone(),
        }
    }
}

#[async_trait]
impl Provider<VideoPrompt, GeneratedMedia> for StabilityVideo {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn attempt(&self, request: &VideoPrompt) -> Result<GeneratedMedia> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::configuration("STABILITY_API_KEY not set"))?;
        let payload = json!({
            "text_prompts": [{ "text": request.full_prompt() }],
            "duration": request.duration_secs,
            "fps": 24,
            "resolution": "720p"
        });
        let resp = self
            .transport
            .post_json(
                &format!("{}/video/generate", self.base_url),
                &payload,
                Auth::Bearer(key),
                REQUEST_TIMEOUT,
            )
            .await?;
        if !resp.is_success() {
            return Err(resp.error_for(Self::TAG));
        }
        let video_url = resp
            .json()?
            .get("video_url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::not_found(Self::TAG, "no video URL in response"))?;
        let bytes = self.transport.download(Self::TAG, &video_url, REQUEST_TIMEOUT).await?;
        Ok(GeneratedMedia {
            asset: MediaAsset::file(request.file_name(Self::TAG), bytes),
            model: Self::TAG.to_string(),
        })
    }
}

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::polling::{output_url, JobState, Poller};
use super::{GeneratedMedia, Provider, VideoPrompt};
use crate::config::{Credentials, PipelineConfig};
use crate::transport::{Auth, HttpTransport};
use crate::types::MediaAsset;
use crate::{Error, Result};

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Replicate predictions API. A prediction is created, then polled at
/// `/predictions/<id>` until it `succeeded`.
pub struct ReplicateVideo {
    transport: HttpTransport,
    poller: Poller,
    base_url: String,
    auth_header: Option<String>,
    version: String,
}

impl ReplicateVideo {
    pub const TAG: &'static str = "replicate";

    pub fn new(transport: HttpTransport, config: &PipelineConfig, credentials: &Credentials) -> Self {
        Self {
            poller: Poller::new(transport.clone(), config.polling.clone()),
            transport,
            base_url: config.endpoints.replicate.trim_end_matches('/').to_string(),
            auth_header: credentials.replicate.as_ref().map(|k| format!("Token {}", k)),
            version: "stable-video-diffusion".to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

fn prediction_state(v: &Value) -> JobState {
    match v.get("status").and_then(Value::as_str) {
        Some("succeeded") => match v.get("output").and_then(output_url) {
            Some(url) => JobState::Done(url),
            None => JobState::Failed("succeeded without output".into()),
        },
        Some(status @ ("failed" | "canceled")) => {
            let detail = v.get("error").and_then(Value::as_str).unwrap_or(status);
            JobState::Failed(detail.to_string())
        }
        _ => JobState::Pending,
    }
}

#[async_trait]
impl Provider<VideoPrompt, GeneratedMedia> for ReplicateVideo {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn is_configured(&self) -> bool {
        self.auth_header.is_some()
    }

    async fn attempt(&self, request: &VideoPrompt) -> Result<GeneratedMedia> {
        let auth = self
            .auth_header
            .as_deref()
            .ok_or_else(|| Error::configuration("REPLICATE_API_KEY not set"))?;
        let payload = json!({
            "version": self.version,
            "input": {
                "prompt": request.full_prompt(),
                "duration": request.duration_secs,
                "fps": 24,
                "resolution": "720p"
            }
        });
        let resp = self
            .transport
            .post_json(
                &format!("{}/predictions", self.base_url),
                &payload,
                Auth::Header(auth),
                SUBMIT_TIMEOUT,
            )
            .await?;
        if !resp.is_success() {
            return Err(resp.error_for(Self::TAG));
        }
        let body = resp.json()?;
        let id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::not_found(Self::TAG, "prediction response has no id"))?;

        let poll_url = format!("{}/predictions/{}", self.base_url, id);
        let video_url = self
            .poller
            .wait(Self::TAG, &poll_url, Auth::Header(auth), prediction_state)
            .await?;
        let bytes = self.transport.download(Self::TAG, &video_url, DOWNLOAD_TIMEOUT).await?;
        Ok(GeneratedMedia {
            asset: MediaAsset::file(request.file_name(Self::TAG), bytes),
            model: Self::TAG.to_string(),
        })
    }
}

//! Hugging Face inference API: text-to-image and text-to-video.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::polling::{output_url, JobState, Poller};
use super::{GeneratedMedia, ImagePrompt, Provider, VideoPrompt};
use crate::config::{Credentials, PipelineConfig};
use crate::transport::{Auth, HttpTransport};
use crate::types::MediaAsset;
use crate::{Error, Result};

pub const DEFAULT_IMAGE_MODEL: &str = "runwayml/stable-diffusion-v1-5";

/// Video models tried in order within one attempt.
pub const VIDEO_MODELS: [&str; 3] = [
    "stabilityai/stable-video-diffusion",
    "runwayml/stable-video-diffusion",
    "damo-vilab/text-to-video-ms-1.7b",
];

const IMAGE_TIMEOUT: Duration = Duration::from_secs(60);
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

fn missing_token() -> Error {
    Error::configuration("Hugging Face token not set")
}

/// Stable Diffusion image generation for shape analogies.
pub struct HuggingFaceImage {
    transport: HttpTransport,
    base_url: String,
    token: Option<String>,
    model: String,
}

impl HuggingFaceImage {
    pub fn new(transport: HttpTransport, config: &PipelineConfig, credentials: &Credentials) -> Self {
        Self {
            transport,
            base_url: config.endpoints.huggingface.trim_end_matches('/').to_string(),
            token: credentials.huggingface_image.clone(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn payload(prompt: &str) -> Value {
        json!({
            "inputs": prompt,
            "parameters": {
                "num_inference_steps": 20,
                "guidance_scale": 7.5
            }
        })
    }
}

#[async_trait]
impl Provider<ImagePrompt, GeneratedMedia> for HuggingFaceImage {
    fn tag(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    async fn attempt(&self, request: &ImagePrompt) -> Result<GeneratedMedia> {
        let token = self.token.as_deref().ok_or_else(missing_token)?;
        let url = format!("{}/models/{}", self.base_url, self.model);
        let resp = self
            .transport
            .post_json(&url, &Self::payload(&request.prompt), Auth::Bearer(token), IMAGE_TIMEOUT)
            .await?;
        if !resp.is_success() {
            return Err(resp.error_for(&self.model));
        }
        if resp.is_json() {
            return Err(Error::not_found(
                &self.model,
                format!("expected image bytes, got JSON: {}", resp.text_lossy()),
            ));
        }
        debug!(model = %self.model, bytes = resp.body.len(), "image generated");
        Ok(GeneratedMedia {
            asset: MediaAsset::file(format!("{}.png", request.file_stem), resp.body),
            model: self.model.clone(),
        })
    }
}

/// Text-to-video through a list of Hugging Face models.
///
/// Models answer either with the video bytes directly or with a `task_id`
/// that is polled at `<base>/tasks/<id>` until `status` is `completed`.
pub struct HuggingFaceVideo {
    transport: HttpTransport,
    poller: Poller,
    base_url: String,
    token: Option<String>,
    models: Vec<String>,
}

impl HuggingFaceVideo {
    pub const TAG: &'static str = "huggingface";

    pub fn new(transport: HttpTransport, config: &PipelineConfig, credentials: &Credentials) -> Self {
        Self {
            poller: Poller::new(transport.clone(), config.polling.clone()),
            transport,
            base_url: config.endpoints.huggingface.trim_end_matches('/').to_string(),
            token: credentials.huggingface_video.clone(),
            models: VIDEO_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    async fn try_model(&self, model: &str, token: &str, request: &VideoPrompt) -> Result<GeneratedMedia> {
        let url = format!("{}/models/{}", self.base_url, model);
        let payload = json!({
            "inputs": request.full_prompt(),
            "parameters": {
                "duration": request.duration_secs,
                "fps": 24,
                "resolution": "720p"
            }
        });
        let resp = self
            .transport
            .post_json(&url, &payload, Auth::Bearer(token), SUBMIT_TIMEOUT)
            .await?;
        if !resp.is_success() {
            return Err(resp.error_for(Self::TAG));
        }

        let bytes = if resp.is_json() {
            let body = resp.json()?;
            let task_id = body
                .get("task_id")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::not_found(Self::TAG, "response has neither video nor task_id"))?;
            let task_url = format!("{}/tasks/{}", self.base_url, task_id);
            let video_url = self
                .poller
                .wait(Self::TAG, &task_url, Auth::Bearer(token), |v| {
                    match v.get("status").and_then(Value::as_str) {
                        Some("completed") => match v.get("output").and_then(output_url) {
                            Some(url) => JobState::Done(url),
                            None => JobState::Failed("completed without video_url".into()),
                        },
                        Some("failed") => JobState::Failed("task failed".into()),
                        _ => JobState::Pending,
                    }
                })
                .await?;
            self.transport.download(Self::TAG, &video_url, DOWNLOAD_TIMEOUT).await?
        } else {
            resp.body
        };

        Ok(GeneratedMedia {
            asset: MediaAsset::file(request.file_name(Self::TAG), bytes),
            model: Self::TAG.to_string(),
        })
    }
}

#[async_trait]
impl Provider<VideoPrompt, GeneratedMedia> for HuggingFaceVideo {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    async fn attempt(&self, request: &VideoPrompt) -> Result<GeneratedMedia> {
        let token = self.token.as_deref().ok_or_else(missing_token)?;
        let mut last_error = None;
        for model in &self.models {
            match self.try_model(model, token, request).await {
                Ok(media) => {
                    debug!(model = %model, "video generated");
                    return Ok(media);
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "video model failed");
                    last_error = Some(e);
                }
            }
        }
        // Each model already had its try; retrying would resubmit to all of them.
        let message = match last_error {
            Some(e) => format!("all {} video models failed, last: {}", self.models.len(), e),
            None => "no video models configured".to_string(),
        };
        Err(Error::not_found(Self::TAG, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;

    fn setup(server: &mockito::Server) -> (HttpTransport, PipelineConfig, Credentials) {
        let config = PipelineConfig::default()
            .with_endpoints(Endpoints::all_at(&server.url()))
            .without_delays();
        let creds = Credentials {
            huggingface_image: Some("hf-token".into()),
            huggingface_video: Some("hf-token".into()),
            ..Credentials::none()
        };
        (HttpTransport::new(&config.http).unwrap(), config, creds)
    }

    #[tokio::test]
    async fn test_image_bytes_become_png_asset() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/models/runwayml/stable-diffusion-v1-5")
            .match_header("authorization", "Bearer hf-token")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(&b"\x89PNG"[..])
            .create_async()
            .await;

        let (transport, config, creds) = setup(&server);
        let media = HuggingFaceImage::new(transport, &config, &creds)
            .attempt(&ImagePrompt {
                prompt: "triangle".into(),
                file_stem: "analogy_001".into(),
            })
            .await
            .unwrap();
        assert_eq!(media.model, DEFAULT_IMAGE_MODEL);
        assert_eq!(media.asset, MediaAsset::file("analogy_001.png", &b"\x89PNG"[..]));
    }

    #[tokio::test]
    async fn test_image_json_body_is_not_an_image() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/models/runwayml/stable-diffusion-v1-5")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Model is loading"}"#)
            .create_async()
            .await;

        let (transport, config, creds) = setup(&server);
        let err = HuggingFaceImage::new(transport, &config, &creds)
            .attempt(&ImagePrompt {
                prompt: "square".into(),
                file_stem: "analogy_002".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_video_task_is_polled_and_downloaded() {
        let mut server = mockito::Server::new_async().await;
        let _submit = server
            .mock("POST", "/models/m1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"task_id":"t9"}"#)
            .create_async()
            .await;
        let _poll = server
            .mock("GET", "/tasks/t9")
            .with_status(200)
            .with_body(format!(
                r#"{{"status":"completed","output":{{"video_url":"{}/files/v.mp4"}}}}"#,
                server.url()
            ))
            .create_async()
            .await;
        let _file = server
            .mock("GET", "/files/v.mp4")
            .with_status(200)
            .with_body("VIDEO")
            .create_async()
            .await;

        let (transport, config, creds) = setup(&server);
        let provider = HuggingFaceVideo::new(transport, &config, &creds).with_models(vec!["m1".into()]);
        let media = provider
            .attempt(&VideoPrompt {
                concept: "sine wave".into(),
                prompt: "Educational animation of sine wave".into(),
                duration_secs: 8,
            })
            .await
            .unwrap();
        assert_eq!(media.model, "huggingface");
        assert_eq!(media.asset.size(), 5);
        match media.asset {
            MediaAsset::File { file_name, .. } => assert!(file_name.starts_with("sine_wave_huggingface_")),
            other => panic!("unexpected asset {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exhausted_models_are_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let a = server
            .mock("POST", "/models/a")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;
        let b = server
            .mock("POST", "/models/b")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let (transport, config, creds) = setup(&server);
        let provider = HuggingFaceVideo::new(transport, &config, &creds).with_models(vec!["a".into(), "b".into()]);
        let chain = crate::pipeline::ProviderChain::new(config.retry.to_policy()).with_provider(provider);
        let outcome = chain
            .run(
                &VideoPrompt {
                    concept: "pendulum".into(),
                    prompt: "p".into(),
                    duration_secs: 5,
                },
                "text_fallback",
                |_| GeneratedMedia {
                    asset: MediaAsset::placeholder("p.txt", "text"),
                    model: "text_fallback".into(),
                },
            )
            .await;

        assert!(outcome.degraded);
        assert_eq!(outcome.attempts[0].tries, 1);
        match &outcome.attempts[0].outcome {
            crate::pipeline::AttemptOutcome::Failed(reason) => {
                assert!(reason.contains("all 2 video models failed"), "{}", reason);
                assert!(reason.contains("503"), "{}", reason);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        a.assert_async().await;
        b.assert_async().await;
    }
}

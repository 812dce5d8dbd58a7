//! Stock photo search used when an article has no image of its own.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::{Illustration, Provider, TopicQuery};
use crate::config::{Credentials, PipelineConfig};
use crate::transport::{Auth, HttpTransport};
use crate::types::MediaAsset;
use crate::{Error, Result};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

fn search_query(topic: &str) -> Vec<(&'static str, String)> {
    vec![
        ("query", topic.to_string()),
        ("per_page", "1".to_string()),
        ("orientation", "landscape".to_string()),
    ]
}

fn remote_photo(url: String, attribution: &str) -> Illustration {
    Illustration {
        asset: MediaAsset::remote(url),
        attribution: attribution.to_string(),
        quality: "high".to_string(),
    }
}

pub struct UnsplashImages {
    transport: HttpTransport,
    base_url: String,
    auth_header: Option<String>,
}

impl UnsplashImages {
    pub const TAG: &'static str = "unsplash";

    pub fn new(transport: HttpTransport, config: &PipelineConfig, credentials: &Credentials) -> Self {
        Self {
            transport,
            base_url: config.endpoints.unsplash.trim_end_matches('/').to_string(),
            auth_header: credentials.unsplash.as_ref().map(|k| format!("Client-ID {}", k)),
        }
    }
}

#[async_trait]
impl Provider<TopicQuery, Illustration> for UnsplashImages {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn is_configured(&self) -> bool {
        self.auth_header.is_some()
    }

    async fn attempt(&self, request: &TopicQuery) -> Result<Illustration> {
        let auth = self
            .auth_header
            .as_deref()
            .ok_or_else(|| Error::configuration("UNSPLASH_ACCESS_KEY not set"))?;
        let body = self
            .transport
            .get_json(
                Self::TAG,
                &format!("{}/search/photos", self.base_url),
                &search_query(&request.topic),
                Auth::Header(auth),
                SEARCH_TIMEOUT,
            )
            .await?;
        body.pointer("/results/0/urls/regular")
            .and_then(Value::as_str)
            .map(|url| remote_photo(url.to_string(), "Photo via Unsplash"))
            .ok_or_else(|| Error::not_found(Self::TAG, format!("no photo for '{}'", request.topic)))
    }
}

pub struct PexelsImages {
    transport: HttpTransport,
    base_url: String,
    api_key: Option<String>,
}

impl PexelsImages {
    pub const TAG: &'static str = "pexels";

    pub fn new(transport: HttpTransport, config: &PipelineConfig, credentials: &Credentials) -> Self {
        Self {
            transport,
            base_url: config.endpoints.pexels.trim_end_matches('/').to_string(),
            api_key: credentials.pexels.clone(),
        }
    }
}

#[async_trait]
impl Provider<TopicQuery, Illustration> for PexelsImages {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn attempt(&self, request: &TopicQuery) -> Result<Illustration> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::configuration("PEXELS_API_KEY not set"))?;
        let body = self
            .transport
            .get_json(
                Self::TAG,
                &format!("{}/v1/search", self.base_url),
                &search_query(&request.topic),
                Auth::Header(key),
                SEARCH_TIMEOUT,
            )
            .await?;
        body.pointer("/photos/0/src/large")
            .and_then(Value::as_str)
            .map(|url| remote_photo(url.to_string(), "Photo via Pexels"))
            .ok_or_else(|| Error::not_found(Self::TAG, format!("no photo for '{}'", request.topic)))
    }
}

use crate::config::HttpSettings;
use crate::transport::TransportError;
use crate::{Error, Result};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Proxy, RequestBuilder};
use std::time::Duration;
use tracing::debug;

/// How a provider authenticates.
#[derive(Clone, Copy)]
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    /// Raw `Authorization` header value (`Token ...`, `Client-ID ...`, bare keys).
    Header(&'a str),
}

/// Status, content type and body of a completed request.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }

    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn a non-2xx response into a provider error.
    pub fn error_for(&self, provider: &str) -> Error {
        let mut body = self.text_lossy();
        body.truncate(300);
        Error::remote(provider, self.status, body)
    }
}

/// Thin wrapper over a shared `reqwest::Client`.
///
/// Every call is a single attempt. Retries and provider fallback live in
/// the pipeline, not here.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &settings.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration(format!("Invalid proxy URL '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;
        Ok(Self { client })
    }

    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        auth: Auth<'_>,
        timeout: Duration,
    ) -> Result<RawResponse> {
        let req = self.client.get(url).query(query).timeout(timeout);
        self.send(with_auth(req, auth), url).await
    }

    pub async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        auth: Auth<'_>,
        timeout: Duration,
    ) -> Result<RawResponse> {
        let req = self.client.post(url).json(body).timeout(timeout);
        self.send(with_auth(req, auth), url).await
    }

    /// GET a JSON document, failing on non-2xx.
    pub async fn get_json(
        &self,
        provider: &str,
        url: &str,
        query: &[(&str, String)],
        auth: Auth<'_>,
        timeout: Duration,
    ) -> Result<serde_json::Value> {
        let resp = self.get(url, query, auth, timeout).await?;
        if !resp.is_success() {
            return Err(resp.error_for(provider));
        }
        resp.json()
    }

    /// Download a media file, failing on non-2xx.
    pub async fn download(&self, provider: &str, url: &str, timeout: Duration) -> Result<Bytes> {
        let resp = self.get(url, &[], Auth::None, timeout).await?;
        if !resp.is_success() {
            return Err(resp.error_for(provider));
        }
        Ok(resp.body)
    }

    async fn send(&self, req: RequestBuilder, url: &str) -> Result<RawResponse> {
        debug!(url, "sending request");
        let resp = req.send().await.map_err(TransportError::Http)?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await.map_err(TransportError::Http)?;
        debug!(url, status, bytes = body.len(), "response received");
        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

fn with_auth(req: RequestBuilder, auth: Auth<'_>) -> RequestBuilder {
    match auth {
        Auth::None => req,
        Auth::Bearer(token) => req.bearer_auth(token),
        Auth::Header(value) => req.header(reqwest::header::AUTHORIZATION, value),
    }
}

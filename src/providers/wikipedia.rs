//! Wikipedia article lookup with a Wikimedia Commons image fallback.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::{Article, Provider, TopicQuery, DEFAULT_LICENSE};
use crate::config::PipelineConfig;
use crate::transport::{Auth, HttpTransport};
use crate::{Error, Result};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const DETAILS_TIMEOUT: Duration = Duration::from_secs(15);

/// Article search against the MediaWiki API. Needs no credential.
///
/// The flow is search (best title) → page details (intro extract, page
/// image, canonical URL). When the page has no image, Commons is searched
/// for a bitmap; Commons failures only cost the image, never the article.
pub struct WikipediaArticles {
    transport: HttpTransport,
    api_url: String,
    pages_url: String,
    commons_url: String,
}

impl WikipediaArticles {
    pub const TAG: &'static str = "wikipedia";

    pub fn new(transport: HttpTransport, config: &PipelineConfig) -> Self {
        Self {
            transport,
            api_url: config.endpoints.wikipedia_api.clone(),
            pages_url: config.endpoints.wikipedia_pages.trim_end_matches('/').to_string(),
            commons_url: config.endpoints.commons_api.clone(),
        }
    }

    async fn query(&self, url: &str, params: &[(&str, &str)], timeout: Duration) -> Result<Value> {
        let mut query: Vec<(&str, String)> = vec![("action", "query".into()), ("format", "json".into())];
        query.extend(params.iter().map(|(k, v)| (*k, v.to_string())));
        self.transport
            .get_json(Self::TAG, url, &query, Auth::None, timeout)
            .await
    }

    async fn best_title(&self, topic: &str) -> Result<String> {
        let body = self
            .query(
                &self.api_url,
                &[("list", "search"), ("srsearch", topic), ("srlimit", "1")],
                SEARCH_TIMEOUT,
            )
            .await?;
        body.pointer("/query/search/0/title")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::not_found(Self::TAG, format!("no article for '{}'", topic)))
    }

    async fn page_details(&self, title: &str) -> Result<Article> {
        let body = self
            .query(
                &self.api_url,
                &[
                    ("prop", "extracts|pageimages|info"),
                    ("titles", title),
                    ("exintro", "1"),
                    ("explaintext", "1"),
                    ("piprop", "original|thumbnail"),
                    ("pithumbsize", "800"),
                    ("inprop", "url"),
                ],
                DETAILS_TIMEOUT,
            )
            .await?;
        let page = body
            .pointer("/query/pages")
            .and_then(Value::as_object)
            .and_then(|pages| pages.values().next())
            .ok_or_else(|| Error::not_found(Self::TAG, format!("no page data for '{}'", title)))?;

        let description = page
            .get("extract")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::not_found(Self::TAG, format!("empty extract for '{}'", title)))?;
        let page_url = page
            .get("fullurl")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}/{}", self.pages_url, title.replace(' ', "_")));
        let image_url = page
            .pointer("/original/source")
            .or_else(|| page.pointer("/thumbnail/source"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Article {
            description: description.to_string(),
            page_url,
            image_url,
            license: DEFAULT_LICENSE.to_string(),
        })
    }

    /// First bitmap on Commons matching `topic`, with its short license name.
    async fn commons_image(&self, topic: &str) -> Result<Option<(String, Option<String>)>> {
        let search = format!("filetype:bitmap {}", topic);
        let body = self
            .query(
                &self.commons_url,
                &[
                    ("list", "search"),
                    ("srsearch", search.as_str()),
                    ("srnamespace", "6"),
                    ("srlimit", "5"),
                ],
                SEARCH_TIMEOUT,
            )
            .await?;
        let Some(file_title) = body.pointer("/query/search/0/title").and_then(Value::as_str) else {
            return Ok(None);
        };

        let info = self
            .query(
                &self.commons_url,
                &[
                    ("prop", "imageinfo"),
                    ("titles", file_title),
                    ("iiprop", "url|extmetadata"),
                ],
                DETAILS_TIMEOUT,
            )
            .await?;
        let image = info
            .pointer("/query/pages")
            .and_then(Value::as_object)
            .and_then(|pages| pages.values().next())
            .and_then(|page| page.pointer("/imageinfo/0"));
        Ok(image.and_then(|image| {
            let url = image.get("url").and_then(Value::as_str)?;
            let license = image
                .pointer("/extmetadata/LicenseShortName/value")
                .and_then(Value::as_str)
                .map(str::to_string);
            Some((url.to_string(), license))
        }))
    }
}

#[async_trait]
impl Provider<TopicQuery, Article> for WikipediaArticles {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn attempt(&self, request: &TopicQuery) -> Result<Article> {
        let title = self.best_title(&request.topic).await?;
        debug!(topic = %request.topic, %title, "article found");
        let mut article = self.page_details(&title).await?;

        if article.image_url.is_none() {
            match self.commons_image(&request.topic).await {
                Ok(Some((url, license))) => {
                    article.image_url = Some(url);
                    if let Some(license) = license {
                        article.license = license;
                    }
                }
                Ok(None) => debug!(topic = %request.topic, "no commons image"),
                Err(e) => warn!(topic = %request.topic, error = %e, "commons lookup failed"),
            }
        }
        Ok(article)
    }
}

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

use super::catalog::{generated_description, topic_profile};
use crate::cache::{CacheKey, TEXT_EXPIRY};
use crate::catalog::{normalize_key, require_subject};
use crate::config::{Credentials, PipelineConfig};
use crate::pipeline::{ChainOutcome, ContentDomain, ProviderChain, Restamped};
use crate::providers::placeholder::{self, GENERATED_IMAGE, GENERATED_SOURCE};
use crate::providers::{
    Article, Illustration, PexelsImages, TopicQuery, UnsplashImages, WikipediaArticles,
    DEFAULT_LICENSE,
};
use crate::transport::HttpTransport;
use crate::types::{timestamp_now, ContentRecord, MediaAsset, RecordKind, TopicSummary};
use crate::Result;

const WIKIPEDIA_ATTRIBUTION: &str = "Wikipedia/Wikimedia Commons";
const GENERATED_ATTRIBUTION: &str = "Generated Educational Content";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRequest {
    pub topic: String,
}

impl TopicRequest {
    /// Rejects topics that are blank after trimming.
    pub fn new(topic: &str) -> Result<Self> {
        Ok(Self {
            topic: require_subject("topic", topic)?,
        })
    }
}

/// Article plus, when the article had no image, a separate illustration.
#[derive(Debug, Clone)]
pub struct TopicCandidate {
    pub article: Article,
    pub illustration: Option<Illustration>,
}

/// Topic summaries: a Wikipedia article (or a generated one) and an image
/// from the article, a stock photo service, or a text diagram.
pub struct TopicSummaryDomain {
    articles: ProviderChain<TopicQuery, Article>,
    images: ProviderChain<TopicQuery, Illustration>,
    pages_url: String,
}

impl TopicSummaryDomain {
    pub fn new(config: &PipelineConfig, credentials: &Credentials) -> Result<Self> {
        let transport = HttpTransport::new(&config.http)?;
        let retry = config.retry.to_policy();
        Ok(Self {
            articles: ProviderChain::new(retry.clone())
                .with_provider(WikipediaArticles::new(transport.clone(), config)),
            images: ProviderChain::new(retry)
                .with_provider(UnsplashImages::new(transport.clone(), config, credentials))
                .with_provider(PexelsImages::new(transport, config, credentials)),
            pages_url: config.endpoints.wikipedia_pages.trim_end_matches('/').to_string(),
        })
    }

    fn generated_article(&self, query: &TopicQuery) -> Article {
        let profile = topic_profile(&query.topic);
        Article {
            description: generated_description(&query.topic, &profile),
            page_url: format!("{}/{}", self.pages_url, query.topic.replace(' ', "_")),
            image_url: None,
            license: DEFAULT_LICENSE.to_string(),
        }
    }
}

fn diagram_illustration(query: &TopicQuery) -> Illustration {
    Illustration {
        asset: placeholder::diagram(&query.topic),
        attribution: GENERATED_ATTRIBUTION.to_string(),
        quality: "generated".to_string(),
    }
}

#[async_trait]
impl ContentDomain for TopicSummaryDomain {
    type Request = TopicRequest;
    type Candidate = TopicCandidate;

    fn kind(&self) -> RecordKind {
        RecordKind::TopicSummary
    }

    fn subject<'r>(&self, request: &'r TopicRequest) -> &'r str {
        &request.topic
    }

    fn cache_key(&self, request: &TopicRequest) -> CacheKey {
        CacheKey::from_parts(&[normalize_key(&request.topic).as_str(), "content"])
    }

    fn cache_expiry(&self) -> Duration {
        TEXT_EXPIRY
    }

    fn media_dir(&self) -> &'static str {
        "images"
    }

    /// The record's source and degradation follow the article; a fallback
    /// image alone only shows up in `image_quality` and the attempts.
    async fn fetch(&self, request: &TopicRequest) -> ChainOutcome<TopicCandidate> {
        let query = TopicQuery {
            topic: request.topic.clone(),
        };
        let article = self
            .articles
            .run(&query, GENERATED_SOURCE, |q| self.generated_article(q))
            .await;
        if article.value.image_url.is_some() {
            return article.map(|article| TopicCandidate {
                article,
                illustration: None,
            });
        }

        let image = self
            .images
            .run(&query, GENERATED_SOURCE, diagram_illustration)
            .await;
        let mut attempts = article.attempts;
        attempts.extend(image.attempts);
        ChainOutcome {
            value: TopicCandidate {
                article: article.value,
                illustration: Some(image.value),
            },
            source: article.source,
            degraded: article.degraded,
            attempts,
        }
    }

    fn media<'c>(&self, candidate: &'c TopicCandidate) -> Vec<&'c MediaAsset> {
        candidate
            .illustration
            .as_ref()
            .map(|i| vec![&i.asset])
            .unwrap_or_default()
    }

    fn describe(
        &self,
        request: &TopicRequest,
        outcome: &ChainOutcome<TopicCandidate>,
        media_dir: &Path,
    ) -> Result<ContentRecord> {
        let profile = topic_profile(&request.topic);
        let candidate = &outcome.value;
        let (image_url, attribution, image_quality) =
            match (&candidate.article.image_url, &candidate.illustration) {
                (Some(url), _) => (url.clone(), WIKIPEDIA_ATTRIBUTION.to_string(), "high".to_string()),
                (None, Some(illustration)) => (
                    illustration.asset.reference(media_dir),
                    illustration.attribution.clone(),
                    illustration.quality.clone(),
                ),
                (None, None) => (
                    GENERATED_IMAGE.to_string(),
                    GENERATED_ATTRIBUTION.to_string(),
                    "generated".to_string(),
                ),
            };

        Ok(TopicSummary {
            id: uuid::Uuid::new_v4().to_string(),
            title: request.topic.clone(),
            description: candidate.article.description.clone(),
            page_url: candidate.article.page_url.clone(),
            image_url,
            license: candidate.article.license.clone(),
            attribution,
            learning_objectives: profile.learning_objectives.clone(),
            difficulty_level: profile.difficulty,
            related_topics: profile.related_topics.clone(),
            created_at: timestamp_now(),
            source: outcome.source.clone(),
            image_quality,
            educational_value: profile.educational_value(),
        }
        .into())
    }

    /// Keys are normalised, so a hit may carry another spelling of the
    /// topic; the record takes this request's.
    fn restamp(&self, request: &TopicRequest, cached: ContentRecord, _media_dir: &Path) -> Restamped {
        match cached {
            ContentRecord::TopicSummary(mut summary) => {
                summary.title = request.topic.clone();
                Restamped::unchanged(summary.into())
            }
            other => Restamped::unchanged(other),
        }
    }
}

//! Pipeline configuration and provider credentials.
//!
//! Precedence, lowest to highest: built-in defaults, YAML file
//! (`--config`), `EDU_FORGE_*` environment variables, CLI flags.
//! Nothing here touches the filesystem until [`PipelineConfig::prepare_dirs`]
//! is called explicitly at start-up.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pipeline::RetryPolicy;
use crate::{Error, ErrorContext, Result};

/// Top-level configuration passed into every pipeline at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root output directory; each domain writes into its own subdirectory.
    pub output_dir: PathBuf,
    /// Directory holding one JSON file per cache key.
    pub cache_dir: PathBuf,
    pub cache_enabled: bool,
    /// Overrides the per-domain cache expiry when set.
    pub cache_expiry_secs: Option<u64>,
    /// Overrides the per-domain delay between batch items when set.
    pub item_delay_ms: Option<u64>,
    pub http: HttpSettings,
    pub retry: RetrySettings,
    pub polling: PollSettings,
    pub endpoints: Endpoints,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            cache_dir: PathBuf::from("cache"),
            cache_enabled: true,
            cache_expiry_secs: None,
            item_delay_ms: None,
            http: HttpSettings::default(),
            retry: RetrySettings::default(),
            polling: PollSettings::default(),
            endpoints: Endpoints::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Upper bound applied to every request; individual calls may use less.
    pub timeout_secs: u64,
    pub proxy_url: Option<String>,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            proxy_url: None,
            user_agent: format!(
                "edu-forge/{} (educational content tool)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetrySettings {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

/// Polling limits for providers that answer with an asynchronous job id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub interval_ms: u64,
    pub max_polls: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            max_polls: 60,
        }
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Base URLs of every external API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub huggingface: String,
    pub replicate: String,
    pub stability: String,
    pub wikipedia_api: String,
    pub wikipedia_pages: String,
    pub commons_api: String,
    pub unsplash: String,
    pub pexels: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            huggingface: "https://api-inference.huggingface.co".into(),
            replicate: "https://api.replicate.com/v1".into(),
            stability: "https://api.stability.ai/v1".into(),
            wikipedia_api: "https://en.wikipedia.org/w/api.php".into(),
            wikipedia_pages: "https://en.wikipedia.org/wiki".into(),
            commons_api: "https://commons.wikimedia.org/w/api.php".into(),
            unsplash: "https://api.unsplash.com".into(),
            pexels: "https://api.pexels.com".into(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at one base URL (mock servers, local mirrors).
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            huggingface: base.to_string(),
            replicate: base.to_string(),
            stability: base.to_string(),
            wikipedia_api: format!("{}/w/api.php", base),
            wikipedia_pages: format!("{}/wiki", base),
            commons_api: format!("{}/commons/w/api.php", base),
            unsplash: base.to_string(),
            pexels: base.to_string(),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("huggingface", &self.huggingface),
            ("replicate", &self.replicate),
            ("stability", &self.stability),
            ("wikipedia_api", &self.wikipedia_api),
            ("wikipedia_pages", &self.wikipedia_pages),
            ("commons_api", &self.commons_api),
            ("unsplash", &self.unsplash),
            ("pexels", &self.pexels),
        ]
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a YAML config file; missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid config file: {}", e),
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("config"),
            )
        })
    }

    /// Apply `EDU_FORGE_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = env::var("EDU_FORGE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("EDU_FORGE_CACHE_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(secs) = env::var("EDU_FORGE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http.timeout_secs = secs;
        }
        if let Ok(proxy) = env::var("EDU_FORGE_PROXY_URL") {
            self.http.proxy_url = Some(proxy);
        }
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_polling(mut self, polling: PollSettings) -> Self {
        self.polling = polling;
        self
    }

    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay_ms = Some(delay.as_millis() as u64);
        self
    }

    /// Settings suitable for tests: no backoff sleeps, no inter-item delay,
    /// short polling.
    pub fn without_delays(self) -> Self {
        self.with_retry(RetrySettings {
            max_attempts: 3,
            base_delay_ms: 0,
            max_delay_ms: 0,
        })
        .with_polling(PollSettings {
            interval_ms: 0,
            max_polls: 3,
        })
        .with_item_delay(Duration::ZERO)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, raw) in self.endpoints.entries() {
            url::Url::parse(raw).map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid endpoint URL '{}': {}", raw, e),
                    ErrorContext::new()
                        .with_field_path(format!("endpoints.{}", name))
                        .with_source("config"),
                )
            })?;
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::configuration_with_context(
                "retry.max_attempts must be at least 1",
                ErrorContext::new().with_field_path("retry.max_attempts"),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "http.timeout_secs must be positive",
                ErrorContext::new().with_field_path("http.timeout_secs"),
            ));
        }
        Ok(())
    }

    /// Create the output and cache directories. Called once at start-up.
    pub fn prepare_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        if self.cache_enabled {
            std::fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

/// Provider credentials, read once at start-up.
///
/// A missing credential disables the matching provider; it is not an error.
#[derive(Clone, Default)]
pub struct Credentials {
    /// `HF_API_TOKEN`: text-to-image for shape analogies.
    pub huggingface_image: Option<String>,
    /// `HF_API_KEY` (falls back to `HF_API_TOKEN`): text-to-video.
    pub huggingface_video: Option<String>,
    pub replicate: Option<String>,
    pub stability: Option<String>,
    pub unsplash: Option<String>,
    pub pexels: Option<String>,
}

impl Credentials {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let image = non_empty_var("HF_API_TOKEN");
        Self {
            huggingface_video: non_empty_var("HF_API_KEY").or_else(|| image.clone()),
            huggingface_image: image,
            replicate: non_empty_var("REPLICATE_API_KEY"),
            stability: non_empty_var("STABILITY_API_KEY"),
            unsplash: non_empty_var("UNSPLASH_ACCESS_KEY"),
            pexels: non_empty_var("PEXELS_API_KEY"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mark(v: &Option<String>) -> &'static str {
            if v.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("Credentials")
            .field("huggingface_image", &mark(&self.huggingface_image))
            .field("huggingface_video", &mark(&self.huggingface_video))
            .field("replicate", &mark(&self.replicate))
            .field("stability", &mark(&self.stability))
            .field("unsplash", &mark(&self.unsplash))
            .field("pexels", &mark(&self.pexels))
            .finish()
    }
}

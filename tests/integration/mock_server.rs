//! Mock HTTP server and scratch directories for integration tests

use edu_forge::config::{Endpoints, PipelineConfig};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Nothing listens here; every request fails at connect.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Config for a run with no reachable provider, rooted in `dir`.
pub fn offline_config(dir: &Path) -> PipelineConfig {
    PipelineConfig::default()
        .with_endpoints(Endpoints::all_at(UNREACHABLE))
        .with_output_dir(dir.join("output"))
        .with_cache_dir(dir.join("cache"))
        .without_delays()
}

/// Test fixture that owns a mock server and the output/cache directories
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
    workdir: TempDir,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server,
            base_url,
            workdir: tempfile::tempdir().expect("tempdir"),
        }
    }

    /// Every endpoint points at the mock server.
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_endpoints(Endpoints::all_at(&self.base_url))
            .with_output_dir(self.output_dir())
            .with_cache_dir(self.workdir.path().join("cache"))
            .without_delays()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.workdir.path().join("output")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// JSON response for any query string.
    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// JSON response only when `key=value` is in the query string.
    pub async fn mock_json_query(&mut self, path: &str, key: &str, value: &str, body: &str) -> Mock {
        self.server
            .mock("GET", path)
            .match_query(Matcher::UrlEncoded(key.into(), value.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    pub async fn mock_bytes(&mut self, method: &str, path: &str, content_type: &str, body: &[u8]) -> Mock {
        self.server
            .mock(method, path)
            .with_status(200)
            .with_header("content-type", content_type)
            .with_body(body)
            .create_async()
            .await
    }
}

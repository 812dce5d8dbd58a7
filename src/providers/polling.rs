//! Polling of asynchronous generation jobs.

use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::PollSettings;
use crate::transport::{Auth, HttpTransport};
use crate::{Error, Result};

const POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Job status as read from one poll response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    /// Finished; carries the URL of the produced media.
    Done(String),
    Failed(String),
}

/// Polls a job URL at a fixed interval until it finishes, fails or the
/// poll budget runs out. Poll-level errors (transport, non-2xx, bad JSON)
/// are logged and count against the budget.
#[derive(Clone)]
pub struct Poller {
    transport: HttpTransport,
    settings: PollSettings,
}

impl Poller {
    pub fn new(transport: HttpTransport, settings: PollSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub async fn wait<F>(&self, provider: &str, url: &str, auth: Auth<'_>, classify: F) -> Result<String>
    where
        F: Fn(&Value) -> JobState,
    {
        for poll in 1..=self.settings.max_polls {
            match self.transport.get(url, &[], auth, POLL_TIMEOUT).await {
                Ok(resp) if resp.is_success() => match resp.json().map(|v| classify(&v)) {
                    Ok(JobState::Done(media_url)) => {
                        debug!(provider, poll, "job finished");
                        return Ok(media_url);
                    }
                    Ok(JobState::Failed(reason)) => {
                        return Err(Error::not_found(provider, format!("job failed: {}", reason)));
                    }
                    Ok(JobState::Pending) => debug!(provider, poll, "job still running"),
                    Err(e) => warn!(provider, poll, error = %e, "unreadable poll response"),
                },
                Ok(resp) => warn!(provider, poll, status = resp.status, "poll request failed"),
                Err(e) => warn!(provider, poll, error = %e, "poll request failed"),
            }
            if poll < self.settings.max_polls && !self.settings.interval().is_zero() {
                tokio::time::sleep(self.settings.interval()).await;
            }
        }
        Err(Error::not_found(
            provider,
            format!("job did not finish after {} polls", self.settings.max_polls),
        ))
    }
}

/// Media URL from a job's `output`, which providers return as an object
/// with `video_url`, a bare string, or a list of strings.
pub(crate) fn output_url(output: &Value) -> Option<String> {
    match output {
        Value::String(url) => Some(url.clone()),
        Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
        Value::Object(map) => map
            .get("video_url")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

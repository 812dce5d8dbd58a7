//! Ordered provider chain ending in a local fallback.

use std::fmt;
use tracing::{debug, info, warn};

use super::retry::RetryPolicy;
use crate::providers::Provider;

/// What happened to one provider during a chain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// No credential; the provider was never called.
    Skipped,
    Failed(String),
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAttempt {
    pub provider: String,
    pub tries: u32,
    pub outcome: AttemptOutcome,
}

impl fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            AttemptOutcome::Skipped => write!(f, "{}: skipped", self.provider),
            AttemptOutcome::Failed(reason) => {
                write!(f, "{}: failed after {} tries ({})", self.provider, self.tries, reason)
            }
            AttemptOutcome::Succeeded => write!(f, "{}: ok", self.provider),
        }
    }
}

/// Result of a chain run. `degraded` is set when the local fallback
/// produced `value`.
#[derive(Debug, Clone)]
pub struct ChainOutcome<C> {
    pub value: C,
    pub source: String,
    pub degraded: bool,
    pub attempts: Vec<ProviderAttempt>,
}

impl<C> ChainOutcome<C> {
    pub fn map<D>(self, f: impl FnOnce(C) -> D) -> ChainOutcome<D> {
        ChainOutcome {
            value: f(self.value),
            source: self.source,
            degraded: self.degraded,
            attempts: self.attempts,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProviderAttempt> {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, AttemptOutcome::Failed(_)))
    }
}

/// Statically ordered providers for one kind of request.
///
/// Providers are tried once each, in order; each gets the retry budget of
/// the chain's [`RetryPolicy`]. The first success wins. When every provider
/// is skipped or fails the fallback runs, so [`ProviderChain::run`] always
/// yields a value.
pub struct ProviderChain<R, C> {
    providers: Vec<Box<dyn Provider<R, C>>>,
    retry: RetryPolicy,
}

impl<R, C> ProviderChain<R, C>
where
    R: Send + Sync,
    C: Send,
{
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            providers: Vec::new(),
            retry,
        }
    }

    pub fn with_provider(mut self, provider: impl Provider<R, C> + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn with_boxed(mut self, provider: Box<dyn Provider<R, C>>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn tags(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.tag()).collect()
    }

    pub async fn run<F>(&self, request: &R, fallback_tag: &str, fallback: F) -> ChainOutcome<C>
    where
        F: FnOnce(&R) -> C,
    {
        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let tag = provider.tag();
            if !provider.is_configured() {
                debug!(provider = tag, "not configured, skipping");
                attempts.push(ProviderAttempt {
                    provider: tag.to_string(),
                    tries: 0,
                    outcome: AttemptOutcome::Skipped,
                });
                continue;
            }

            let retried = self
                .retry
                .run(tag, |_| provider.attempt(request))
                .await;
            match retried.result {
                Ok(value) => {
                    info!(provider = tag, tries = retried.attempts, "provider succeeded");
                    attempts.push(ProviderAttempt {
                        provider: tag.to_string(),
                        tries: retried.attempts,
                        outcome: AttemptOutcome::Succeeded,
                    });
                    return ChainOutcome {
                        value,
                        source: tag.to_string(),
                        degraded: false,
                        attempts,
                    };
                }
                Err(e) => {
                    warn!(provider = tag, tries = retried.attempts, error = %e, "provider failed, moving on");
                    attempts.push(ProviderAttempt {
                        provider: tag.to_string(),
                        tries: retried.attempts,
                        outcome: AttemptOutcome::Failed(e.to_string()),
                    });
                }
            }
        }

        warn!(fallback = fallback_tag, "no provider produced content, using local fallback");
        ChainOutcome {
            value: fallback(request),
            source: fallback_tag.to_string(),
            degraded: true,
            attempts,
        }
    }
}

//! Sequential batch execution over one pipeline.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::pipeline::{ContentDomain, ContentPipeline, Processed};
use crate::types::{ContentRecord, RecordKind};
use crate::Result;

/// A subject that produced no record.
#[derive(Debug, Clone)]
pub struct BatchError {
    pub index: usize,
    pub subject: String,
    pub message: String,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Batch error at {} ({}): {}", self.index, self.subject, self.message)
    }
}

impl std::error::Error for BatchError {}

#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Successful items in input order.
    pub successes: Vec<Processed>,
    pub failures: Vec<BatchError>,
    pub execution_time: Duration,
    pub total_processed: usize,
    pub aggregate_path: Option<PathBuf>,
}

impl BatchResult {
    fn new() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
            execution_time: Duration::ZERO,
            total_processed: 0,
            aggregate_path: None,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn degraded_count(&self) -> usize {
        self.successes.iter().filter(|p| p.origin.is_degraded()).count()
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_processed == 0 {
            0.0
        } else {
            self.successes.len() as f64 / self.total_processed as f64
        }
    }

    pub fn records(&self) -> Vec<ContentRecord> {
        self.successes.iter().map(|p| p.record.clone()).collect()
    }
}

/// Pause between items when nothing overrides it.
pub fn default_item_delay(kind: RecordKind) -> Duration {
    match kind {
        RecordKind::ShapeAnalogy | RecordKind::TopicSummary => Duration::from_secs(1),
        RecordKind::ConceptAnimation => Duration::from_secs(2),
    }
}

/// Runs requests one at a time with a fixed pause between them.
///
/// A failed item is logged and skipped; the others still run. Each success
/// gets its per-subject file as it completes and the aggregate file is
/// written once at the end.
pub struct BatchRunner {
    item_delay: Duration,
}

impl BatchRunner {
    pub fn new(item_delay: Duration) -> Self {
        Self { item_delay }
    }

    pub fn for_kind(kind: RecordKind, config: &PipelineConfig) -> Self {
        let delay = config
            .item_delay_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| default_item_delay(kind));
        Self::new(delay)
    }

    pub fn item_delay(&self) -> Duration {
        self.item_delay
    }

    pub async fn run<D: ContentDomain>(
        &self,
        pipeline: &ContentPipeline<D>,
        requests: &[D::Request],
    ) -> Result<BatchResult> {
        let start = Instant::now();
        let total = requests.len();
        let mut result = BatchResult::new();

        for (index, request) in requests.iter().enumerate() {
            let subject = pipeline.domain().subject(request);
            info!(item = index + 1, total, subject, "processing");
            match pipeline.run(request).await {
                Ok(processed) => result.successes.push(processed),
                Err(e) => {
                    warn!(item = index + 1, subject, error = %e, "item failed, skipping");
                    result.failures.push(BatchError {
                        index,
                        subject: subject.to_string(),
                        message: e.to_string(),
                    });
                }
            }
            if index + 1 < total && !self.item_delay.is_zero() {
                tokio::time::sleep(self.item_delay).await;
            }
        }

        let aggregate = pipeline
            .writer()
            .write_aggregate(pipeline.domain().kind(), &result.records())
            .await?;
        result.aggregate_path = Some(aggregate);
        result.execution_time = start.elapsed();
        result.total_processed = total;
        info!(
            succeeded = result.success_count(),
            failed = result.failure_count(),
            degraded = result.degraded_count(),
            elapsed_ms = result.execution_time.as_millis() as u64,
            "batch finished"
        );
        Ok(result)
    }
}

//! Paced request worker loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::metrics::RunMetrics;
use crate::sample::{random_sample, InferenceRequest};

/// One independent request-issuing loop.
///
/// Workers own their id and request counter outright; the only shared state
/// is the pooled client and the metrics collector, neither of which a worker
/// mutates structurally. The deadline is checked at the top of the loop, so a
/// worker that is mid-sleep when the deadline passes still finishes cleanly.
pub struct Worker {
    id: usize,
    url: String,
    interval: Duration,
    deadline: Instant,
    client: reqwest::Client,
    metrics: Arc<RunMetrics>,
}

impl Worker {
    pub fn new(
        id: usize,
        url: String,
        interval: Duration,
        deadline: Instant,
        client: reqwest::Client,
        metrics: Arc<RunMetrics>,
    ) -> Self {
        Self {
            id,
            url,
            interval,
            deadline,
            client,
            metrics,
        }
    }

    /// Issue paced requests until the shared deadline passes, printing one
    /// line per attempt. Failures are reported and never abort the loop.
    pub async fn run(self) {
        let mut req_id: u64 = 0;
        while Instant::now() < self.deadline {
            let body = InferenceRequest::new(random_sample());
            let started = Instant::now();
            match self.execute(&body).await {
                Ok((status, rendered)) => {
                    if status.is_success() {
                        self.metrics.record_success(started.elapsed());
                    } else {
                        self.metrics.record_error();
                    }
                    println!(
                        "[worker {} | {}] status={} -> {}",
                        self.id,
                        req_id,
                        status.as_u16(),
                        rendered
                    );
                }
                Err(err) => {
                    self.metrics.record_error();
                    println!("[worker {} | {}] ERROR {}", self.id, req_id, err);
                }
            }
            req_id += 1;
            tokio::time::sleep(self.interval).await;
        }
        tracing::debug!(worker = self.id, requests = req_id, "worker finished");
    }

    /// POST one envelope and render the response body.
    ///
    /// A JSON content type gets parsed and re-rendered compactly; anything
    /// else, including a JSON content type over a body that does not parse,
    /// falls back to the raw text. A non-JSON body is a printable outcome,
    /// not an error.
    async fn execute(
        &self,
        body: &InferenceRequest,
    ) -> Result<(reqwest::StatusCode, String), reqwest::Error> {
        let response = self.client.post(&self.url).json(body).send().await?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("json"))
            .unwrap_or(false);
        let text = response.text().await?;

        let rendered = if is_json {
            match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(parsed) => parsed.to_string(),
                Err(_) => text,
            }
        } else {
            text
        };

        Ok((status, rendered))
    }
}

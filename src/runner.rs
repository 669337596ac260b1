//! Run orchestration: shared HTTP client, worker spawning, summary.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, REQUEST_TIMEOUT};
use crate::error::Result;
use crate::metrics::{RunMetrics, RunSummary};
use crate::worker::Worker;

/// Drives one load-test run: builds the pooled client, spawns the workers
/// and waits for all of them to observe the deadline.
pub struct LoadRunner {
    config: Config,
    client: reqwest::Client,
    metrics: Arc<RunMetrics>,
}

impl LoadRunner {
    /// Build the runner and its shared HTTP client.
    ///
    /// The client is created once and shared read-only across workers; it is
    /// released when the runner drops, on every exit path.
    pub fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(config.concurrency)
            .build()?;

        Ok(Self {
            config,
            client,
            metrics: Arc::new(RunMetrics::new()),
        })
    }

    /// Run against the configured endpoint for the configured duration.
    pub async fn run(&self) -> RunSummary {
        let deadline = Instant::now() + self.config.duration();
        self.run_until(&self.config.target_url(), deadline).await
    }

    /// Run against an explicit URL until `deadline`.
    ///
    /// Completion means every worker has exited; no in-flight request is
    /// forcibly aborted by the deadline, only the per-request timeout.
    pub async fn run_until(&self, url: &str, deadline: Instant) -> RunSummary {
        let interval = self.config.pacing_interval();

        let mut handles = Vec::with_capacity(self.config.concurrency);
        for id in 0..self.config.concurrency {
            let worker = Worker::new(
                id,
                url.to_string(),
                interval,
                deadline,
                self.client.clone(),
                self.metrics.clone(),
            );
            handles.push(tokio::spawn(worker.run()));
        }

        let _ = join_all(handles).await;

        self.metrics.summary()
    }
}

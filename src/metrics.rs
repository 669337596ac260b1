//! Run statistics backed by HdrHistogram.

use hdrhistogram::Histogram;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Thread-safe collector shared read-only by all workers for one run.
pub struct RunMetrics {
    /// Latency of completed 2xx requests (microseconds)
    latencies: Mutex<Histogram<u64>>,
    /// Requests that completed with a 2xx status
    success_count: AtomicU64,
    /// Transport errors, timeouts and non-2xx responses
    error_count: AtomicU64,
    started: Instant,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self {
            // Latencies up to the 30s request timeout, 3 significant figures
            latencies: Mutex::new(Histogram::new_with_bounds(1, 60_000_000, 3).unwrap()),
            success_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Record a completed 2xx request
    pub fn record_success(&self, latency: Duration) {
        let latency_us = latency.as_micros() as u64;
        if let Ok(mut hist) = self.latencies.lock() {
            let _ = hist.record(latency_us.max(1));
        }
        self.success_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed request (transport error, timeout or non-2xx status)
    pub fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn success_count(&self) -> u64 {
        self.success_count.load(Ordering::Relaxed)
    }

    pub fn error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    pub fn total_requests(&self) -> u64 {
        self.success_count() + self.error_count()
    }

    fn latency_percentile_ms(&self, percentile: f64) -> f64 {
        let hist = self.latencies.lock().unwrap();
        hist.value_at_percentile(percentile) as f64 / 1000.0
    }

    /// Snapshot the counters and percentiles for end-of-run reporting.
    pub fn summary(&self) -> RunSummary {
        let total = self.total_requests();
        let success_rate = if total == 0 {
            100.0
        } else {
            (self.success_count() as f64 / total as f64) * 100.0
        };
        let elapsed = self.started.elapsed().as_secs_f64();
        let requests_per_second = if elapsed == 0.0 {
            0.0
        } else {
            total as f64 / elapsed
        };

        RunSummary {
            success_count: self.success_count(),
            error_count: self.error_count(),
            success_rate,
            requests_per_second,
            latency_p50_ms: self.latency_percentile_ms(50.0),
            latency_p95_ms: self.latency_percentile_ms(95.0),
            latency_p99_ms: self.latency_percentile_ms(99.0),
            elapsed_secs: elapsed,
        }
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Final statistics for a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub success_count: u64,
    pub error_count: u64,
    pub success_rate: f64,
    pub requests_per_second: f64,
    pub latency_p50_ms: f64,
    pub latency_p95_ms: f64,
    pub latency_p99_ms: f64,
    pub elapsed_secs: f64,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "--- run summary ---")?;
        writeln!(
            f,
            "requests: {} ok, {} failed ({:.1}% success)",
            self.success_count, self.error_count, self.success_rate
        )?;
        writeln!(
            f,
            "achieved rate: {:.2} req/s over {:.1}s",
            self.requests_per_second, self.elapsed_secs
        )?;
        write!(
            f,
            "latency ms: p50={:.1} p95={:.1} p99={:.1}",
            self.latency_p50_ms, self.latency_p95_ms, self.latency_p99_ms
        )
    }
}

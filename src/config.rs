use clap::Parser;
use std::time::Duration;

use crate::error::{LoadGenError, Result};

/// NodePort the MLServer inference service is exposed on.
pub const INFER_PORT: u16 = 32255;

/// Upper bound for a single in-flight request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wine Load Generator - prints every response from the inference endpoint
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Inference endpoint host or IP
    #[arg(short = 'H', long, env = "LOADGEN_HOST")]
    pub host: String,

    /// Model name in the URL path
    #[arg(short, long, env = "LOADGEN_MODEL", default_value = "mlflow-model")]
    pub model: String,

    /// Total requests per minute across all workers
    #[arg(short, long, env = "LOADGEN_RATE", default_value = "100")]
    pub rate: u32,

    /// Test duration in minutes
    #[arg(long, env = "LOADGEN_MINUTES", default_value = "1")]
    pub minutes: u64,

    /// Number of concurrent workers
    #[arg(short, long, env = "LOADGEN_CONCURRENCY", default_value = "10")]
    pub concurrency: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Immutable configuration for one load-test run.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub model: String,
    pub rate: u32,
    pub minutes: u64,
    pub concurrency: usize,
    pub log_level: String,
}

impl From<CliArgs> for Config {
    fn from(args: CliArgs) -> Self {
        Self {
            host: args.host,
            model: args.model,
            rate: args.rate,
            minutes: args.minutes,
            concurrency: args.concurrency,
            log_level: args.log_level,
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI > ENV > defaults.
    pub fn load() -> Self {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Config::from(CliArgs::parse())
    }

    /// Validate once at startup; the config is immutable afterwards.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(LoadGenError::InvalidConfig("host must not be empty".into()));
        }
        if self.rate < 1 {
            return Err(LoadGenError::InvalidConfig(
                "rate must be at least 1 request per minute".into(),
            ));
        }
        if self.minutes == 0 {
            return Err(LoadGenError::InvalidConfig(
                "minutes must be greater than zero".into(),
            ));
        }
        if self.concurrency < 1 {
            return Err(LoadGenError::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Delay each worker waits between successive requests.
    ///
    /// The aggregate rate is split evenly across workers; if the per-worker
    /// share falls below 1 request per minute it floors there, so the interval
    /// never exceeds 60 seconds.
    pub fn pacing_interval(&self) -> Duration {
        let per_worker_rate = (self.rate as f64 / self.concurrency as f64).max(1.0);
        Duration::from_secs_f64(60.0 / per_worker_rate)
    }

    /// Total wall-clock duration of the run.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.minutes * 60)
    }

    /// V2 inference endpoint URL for the configured host and model.
    pub fn target_url(&self) -> String {
        format!(
            "http://{}:{}/models/{}/infer",
            self.host, INFER_PORT, self.model
        )
    }
}

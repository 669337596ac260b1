use anyhow::Result;

use wine_loadgen::config::Config;
use wine_loadgen::runner::LoadRunner;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load();
    config.validate()?;

    // Initialize logging with the configured level
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let runner = LoadRunner::new(config.clone())?;

    tracing::info!("Target: {}", config.target_url());
    tracing::info!(
        "{} workers, {} req/min aggregate, {:.1}s pacing interval, {} minute(s)",
        config.concurrency,
        config.rate,
        config.pacing_interval().as_secs_f64(),
        config.minutes
    );

    // Returning from main on interrupt tears down the runtime, which stops
    // the worker tasks; the interrupt is an expected, silent exit path.
    tokio::select! {
        summary = runner.run() => {
            println!("{}", summary);
            tracing::info!("Run complete");
        }
        _ = shutdown_signal() => {
            tracing::debug!("Interrupted, exiting");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

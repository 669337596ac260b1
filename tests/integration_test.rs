// Integration tests for the wine load generator
//
// These tests drive the full runner and worker stack against a local mock
// inference endpoint, covering the success, text-fallback and failure paths.

use std::time::{Duration, Instant};

use wine_loadgen::config::Config;
use wine_loadgen::mock_server::{MockInferenceServer, MockResponse};
use wine_loadgen::runner::LoadRunner;

// ==================================================================================================
// Test Helpers
// ==================================================================================================

/// Config whose pacing interval is 500ms (120 req/min per worker), so a short
/// deadline gives each worker exactly one iteration.
fn test_config(concurrency: usize) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        model: "mlflow-model".to_string(),
        rate: (concurrency as u32) * 120,
        minutes: 1,
        concurrency,
        log_level: "info".to_string(),
    }
}

async fn start_mock(response: MockResponse) -> MockInferenceServer {
    let mut server = MockInferenceServer::new(response);
    server.start().await.expect("mock server failed to start");
    server
}

/// A local port with nothing listening on it.
fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

// ==================================================================================================
// Success Path
// ==================================================================================================

#[tokio::test]
async fn test_each_worker_issues_requests() {
    let server = start_mock(MockResponse::Predictions).await;
    let config = test_config(3);
    let runner = LoadRunner::new(config.clone()).unwrap();

    let deadline = Instant::now() + Duration::from_millis(150);
    let summary = runner.run_until(&server.infer_url(&config.model), deadline).await;

    // One iteration per worker: the 500ms pacing sleep outlives the deadline
    assert_eq!(server.hits(), 3);
    assert_eq!(summary.success_count, 3);
    assert_eq!(summary.error_count, 0);
    assert!(summary.success_rate > 99.9);
}

#[tokio::test]
async fn test_json_response_counts_as_success() {
    let server = start_mock(MockResponse::Predictions).await;
    let config = test_config(1);
    let runner = LoadRunner::new(config.clone()).unwrap();

    let deadline = Instant::now() + Duration::from_millis(150);
    let summary = runner.run_until(&server.infer_url(&config.model), deadline).await;

    assert!(summary.success_count >= 1);
    assert_eq!(summary.error_count, 0);
    assert!(summary.latency_p50_ms > 0.0);
}

#[tokio::test]
async fn test_plain_text_response_is_not_an_error() {
    // A non-JSON body falls back to raw text and still counts as a success
    let server = start_mock(MockResponse::PlainText).await;
    let config = test_config(2);
    let runner = LoadRunner::new(config.clone()).unwrap();

    let deadline = Instant::now() + Duration::from_millis(150);
    let summary = runner.run_until(&server.infer_url(&config.model), deadline).await;

    assert_eq!(summary.error_count, 0);
    assert!(summary.success_count >= 2);
}

// ==================================================================================================
// Failure Paths
// ==================================================================================================

#[tokio::test]
async fn test_server_errors_do_not_abort_the_run() {
    let server = start_mock(MockResponse::ServerError).await;
    let config = test_config(3);
    let runner = LoadRunner::new(config.clone()).unwrap();

    let deadline = Instant::now() + Duration::from_millis(150);
    let summary = runner.run_until(&server.infer_url(&config.model), deadline).await;

    // Every worker still completed its iteration despite the 500s
    assert_eq!(server.hits(), 3);
    assert_eq!(summary.success_count, 0);
    assert_eq!(summary.error_count, 3);
}

#[tokio::test]
async fn test_connection_refused_is_reported_per_request() {
    let port = unused_port();
    let url = format!("http://127.0.0.1:{}/models/mlflow-model/infer", port);
    let config = test_config(2);
    let runner = LoadRunner::new(config).unwrap();

    let deadline = Instant::now() + Duration::from_millis(150);
    let summary = runner.run_until(&url, deadline).await;

    assert_eq!(summary.success_count, 0);
    assert!(summary.error_count >= 2);
}

// ==================================================================================================
// Termination
// ==================================================================================================

#[tokio::test]
async fn test_run_terminates_within_deadline_plus_one_interval() {
    let server = start_mock(MockResponse::Predictions).await;
    let config = test_config(4);
    let runner = LoadRunner::new(config.clone()).unwrap();

    let started = Instant::now();
    let deadline = started + Duration::from_millis(150);
    runner.run_until(&server.infer_url(&config.model), deadline).await;

    // 150ms of issuing plus one 500ms pacing sleep, with generous slack
    assert!(started.elapsed() < Duration::from_secs(5));
}

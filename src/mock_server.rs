//! Mock MLServer inference endpoint used by the integration tests.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// How the mock answers inference requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockResponse {
    /// 200 with a V2 inference JSON body
    Predictions,
    /// 200 with a text/plain body, exercising the raw-text fallback
    PlainText,
    /// 500 with a short error body
    ServerError,
}

struct MockState {
    response: MockResponse,
    hits: AtomicU64,
}

/// Mock inference server bound to a random local port.
pub struct MockInferenceServer {
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    port: u16,
}

impl MockInferenceServer {
    pub fn new(response: MockResponse) -> Self {
        Self {
            state: Arc::new(MockState {
                response,
                hits: AtomicU64::new(0),
            }),
            shutdown_tx: None,
            port: 0,
        }
    }

    /// Start the server and return the bound port.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        self.port = port;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        let app = Router::new()
            .route("/models/:model/infer", post(handle_infer))
            .with_state(self.state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Ok(port)
    }

    /// Inference URL for the given model name.
    pub fn infer_url(&self, model: &str) -> String {
        format!("http://127.0.0.1:{}/models/{}/infer", self.port, model)
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> u64 {
        self.state.hits.load(Ordering::Relaxed)
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockInferenceServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_infer(
    State(state): State<Arc<MockState>>,
    Path(model): Path<String>,
) -> Response {
    state.hits.fetch_add(1, Ordering::Relaxed);

    match state.response {
        MockResponse::Predictions => Json(json!({
            "model_name": model,
            "outputs": [{
                "name": "output-1",
                "datatype": "FP64",
                "shape": [1, 1],
                "data": [5.672]
            }]
        }))
        .into_response(),
        MockResponse::PlainText => {
            ([(header::CONTENT_TYPE, "text/plain")], "prediction: 5.672").into_response()
        }
        MockResponse::ServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "simulated failure").into_response()
        }
    }
}

//! Test utilities for tally-core
//!
//! Provides a mock Gemini server speaking just enough of the
//! `generateContent` REST API to drive the real [`GeminiBackend`] in tests.
//!
//! [`GeminiBackend`]: crate::ai::GeminiBackend

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// What the mock answers to generateContent calls
#[derive(Clone, Debug)]
enum Reply {
    Text(String),
    Status(StatusCode),
}

/// Mock Gemini server for tests
pub struct MockGeminiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start a server whose model always answers with `text`
    pub async fn with_text(text: &str) -> Self {
        Self::start(Reply::Text(text.to_string())).await
    }

    /// Start a server whose generateContent calls fail with `status`
    pub async fn with_status(status: u16) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::start(Reply::Status(status)).await
    }

    async fn start(reply: Reply) -> Self {
        let app = Router::new()
            .route("/v1beta/models/:model", get(handle_model).post(handle_generate))
            .with_state(Arc::new(reply));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Model metadata endpoint (health check)
async fn handle_model(Path(model): Path<String>) -> Json<Value> {
    Json(json!({
        "name": format!("models/{}", model),
        "displayName": model,
    }))
}

/// `POST /v1beta/models/{model}:generateContent`
async fn handle_generate(
    State(reply): State<Arc<Reply>>,
    Path(model_action): Path<String>,
    Json(_request): Json<Value>,
) -> Response {
    if !model_action.ends_with(":generateContent") {
        return StatusCode::NOT_FOUND.into_response();
    }

    match reply.as_ref() {
        Reply::Status(status) => (
            *status,
            Json(json!({"error": {"code": status.as_u16(), "message": "mock failure"}})),
        )
            .into_response(),
        Reply::Text(text) => Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
    }
}

//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Response for the /health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether AI calls will be attempted (false = fallback mode)
    pub ai_enabled: bool,
    pub ai_backend: Option<&'static str>,
    pub model: Option<String>,
}

/// GET /health - Liveness and AI availability
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let assistant = &state.assistant;
    Json(HealthResponse {
        status: "ok",
        ai_enabled: assistant.is_enabled(),
        ai_backend: assistant.backend_name(),
        model: assistant.model().map(str::to_string),
    })
}

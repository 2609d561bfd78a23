//! AI-assisted parsing and insights handlers
//!
//! Both endpoints always succeed for a logged-in user: when AI is not
//! configured or the model call fails, the assistant's fallback is returned.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use tally_core::assistant::insights_cutoff;
use tally_core::{format_insight_lines, ParsedExpense};

use crate::{AppError, AppState, AuthUser};

/// Request body for free-text parsing
#[derive(Debug, Deserialize)]
pub struct ParseTextRequest {
    #[serde(default)]
    pub text: String,
}

/// Response for the insights endpoint
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: String,
}

/// POST /api/ai/parse-text - Turn free text into expense fields
///
/// The result is a suggestion for the add-expense form; nothing is stored.
pub async fn parse_text(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    payload: Result<Json<ParseTextRequest>, JsonRejection>,
) -> Result<Json<ParsedExpense>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(&e.body_text()))?;
    Ok(Json(state.assistant.parse_expense_text(&req.text).await))
}

/// GET /api/ai/insights - Summarise the current user's last 30 days
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<InsightsResponse>, AppError> {
    let cutoff = insights_cutoff(Utc::now().date_naive());
    let expenses = state.db.list_expenses_since(user.user_id, cutoff)?;
    let lines = format_insight_lines(&expenses);

    let insights = state.assistant.generate_insights(&lines).await;
    Ok(Json(InsightsResponse { insights }))
}

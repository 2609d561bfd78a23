//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tally_core::{Expense, NewExpense};

use crate::{AppError, AppState, AuthUser};

/// Request body for adding an expense
///
/// Fields are loosely typed so validation can report which one is wrong;
/// `amount` may arrive as a number or a numeric string.
#[derive(Debug, Deserialize)]
pub struct AddExpenseRequest {
    pub date: Option<String>,
    pub amount: Option<serde_json::Value>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Response for a created expense
#[derive(Debug, Serialize)]
pub struct AddExpenseResponse {
    pub message: &'static str,
    pub id: i64,
}

/// POST /api/expense - Record an expense for the current user
pub async fn add_expense(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: Result<Json<AddExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddExpenseResponse>), AppError> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(&e.body_text()))?;

    let expense = NewExpense::from_raw(
        req.date.as_deref(),
        req.amount.as_ref(),
        req.category.as_deref(),
        req.description.as_deref(),
    )
    .map_err(AppError::from_core)?;

    let id = state.db.insert_expense(user.user_id, &expense)?;
    debug!(user_id = user.user_id, expense_id = id, "Expense added");

    Ok((
        StatusCode::CREATED,
        Json(AddExpenseResponse {
            message: "Expense added",
            id,
        }),
    ))
}

/// GET /api/expense - All of the current user's expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Expense>>, AppError> {
    let expenses = state.db.list_expenses(user.user_id)?;
    Ok(Json(expenses))
}

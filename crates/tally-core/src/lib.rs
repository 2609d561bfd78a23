//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Database access (users, expenses, sessions) with connection pooling
//! - Password hashing
//! - Pluggable hosted AI backends (Gemini, OpenAI-compatible, mock)
//! - Prompt templates for the AI features
//! - The expense assistant: free-text parsing and spending insights with
//!   deterministic fallbacks when AI is unavailable

pub mod ai;
pub mod assistant;
pub mod db;
pub mod error;
pub mod models;
pub mod password;
pub mod prompts;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, AiConfig, BackendKind, MockBackend};
pub use assistant::{format_insight_lines, ExpenseAssistant, INSIGHTS_WINDOW_DAYS};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{Expense, ExpenseCategory, NewExpense, ParsedExpense, Session, User};

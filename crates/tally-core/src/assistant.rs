//! Expense assistant: AI-backed parsing and insights with fallbacks
//!
//! Wraps an optional [`AIClient`]. With no client (no credential configured)
//! every call takes the fallback path without touching the network. With a
//! client, any model failure is logged and replaced by the same deterministic
//! fallback, so callers never see an AI error.

use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::ai::parsing::parse_expense_response;
use crate::ai::{AIBackend, AIClient, AiConfig};
use crate::models::{Expense, ParsedExpense};
use crate::prompts::{insights_prompt, parse_expense_prompt};

/// Size of the rolling insights window in days
pub const INSIGHTS_WINDOW_DAYS: i64 = 30;

/// AI-backed expense helper with deterministic fallbacks
#[derive(Clone, Default)]
pub struct ExpenseAssistant {
    client: Option<AIClient>,
}

impl ExpenseAssistant {
    pub fn new(client: Option<AIClient>) -> Self {
        Self { client }
    }

    /// Build from configuration; a config without a credential yields a
    /// permanently degraded assistant
    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(AIClient::from_config(config))
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&AIClient> {
        self.client.as_ref()
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.client.as_ref().map(|c| c.backend_name())
    }

    pub fn model(&self) -> Option<&str> {
        self.client.as_ref().map(|c| c.model())
    }

    /// Turn free text into expense fields
    ///
    /// Never fails: without a client, or when the model call or the JSON
    /// extraction fails, returns [`ParsedExpense::fallback`].
    pub async fn parse_expense_text(&self, text: &str) -> ParsedExpense {
        let Some(client) = &self.client else {
            return ParsedExpense::fallback(text);
        };

        let prompt = parse_expense_prompt(text);
        let raw = match client.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(backend = client.backend_name(), error = %e, "Expense parse failed, using fallback");
                return ParsedExpense::fallback(text);
            }
        };
        debug!("Raw parse response: {}", raw);

        match parse_expense_response(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Unusable expense parse response, using fallback");
                ParsedExpense::fallback(text)
            }
        }
    }

    /// Summarise pre-formatted expense lines
    ///
    /// Returns the model's text unchanged, or a fallback message reporting
    /// the number of non-empty input lines.
    pub async fn generate_insights(&self, expenses_text: &str) -> String {
        let rows = count_rows(expenses_text);
        let Some(client) = &self.client else {
            return format!(
                "Insights are not yet powered by real AI.\nTotal records considered:\n{} expense rows.",
                rows
            );
        };

        match client.generate(&insights_prompt(expenses_text)).await {
            Ok(text) => text,
            Err(e) => {
                warn!(backend = client.backend_name(), error = %e, "Insights generation failed, using fallback");
                format!(
                    "AI insights are temporarily unavailable (model error).\nTotal records considered:\n{} expense rows.",
                    rows
                )
            }
        }
    }
}

/// Number of non-empty lines
pub fn count_rows(expenses_text: &str) -> usize {
    expenses_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count()
}

/// First date inside the insights window ending at `today`
pub fn insights_cutoff(today: NaiveDate) -> NaiveDate {
    today - Duration::days(INSIGHTS_WINDOW_DAYS)
}

/// Render expenses as `date | category | amount | description` lines
pub fn format_insight_lines(expenses: &[Expense]) -> String {
    expenses
        .iter()
        .map(|e| format!("{} | {} | {} | {}", e.date, e.category, e.amount, e.description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::models::{ExpenseCategory, NO_DESCRIPTION};

    fn scripted(response: &str) -> ExpenseAssistant {
        ExpenseAssistant::new(Some(AIClient::Mock(MockBackend::with_response(response))))
    }

    fn failing() -> ExpenseAssistant {
        ExpenseAssistant::new(Some(AIClient::Mock(MockBackend::failing("connection refused"))))
    }

    #[tokio::test]
    async fn test_disabled_parse_of_empty_text() {
        let parsed = ExpenseAssistant::disabled().parse_expense_text("").await;
        assert_eq!(parsed.amount(), Some(0.0));
        assert_eq!(parsed.category(), Some("Misc"));
        assert_eq!(parsed.description(), Some(NO_DESCRIPTION));
    }

    #[tokio::test]
    async fn test_disabled_parse_keeps_text() {
        let parsed = ExpenseAssistant::disabled()
            .parse_expense_text("Paid 500 for electricity bill")
            .await;
        assert_eq!(parsed.amount(), Some(0.0));
        assert_eq!(parsed.category(), Some("Misc"));
        assert_eq!(parsed.description(), Some("Paid 500 for electricity bill"));
    }

    #[tokio::test]
    async fn test_parse_extracts_embedded_object() {
        let assistant =
            scripted(r#"Sure! {"amount":500,"category":"Electricity","description":"bill"} thanks"#);
        let parsed = assistant.parse_expense_text("Paid 500 for electricity bill").await;
        assert_eq!(parsed.amount(), Some(500.0));
        assert_eq!(parsed.category(), Some("Electricity"));
        assert_eq!(parsed.description(), Some("bill"));
    }

    #[tokio::test]
    async fn test_parse_returns_model_object_unchanged() {
        let assistant = scripted(r#"{"amount":"500","category":"Power","currency":"INR"}"#);
        let parsed = assistant.parse_expense_text("Paid 500 for electricity bill").await;
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            serde_json::json!({"amount": "500", "category": "Power", "currency": "INR"})
        );
    }

    #[tokio::test]
    async fn test_parse_falls_back_on_garbage() {
        let parsed = scripted("I am not sure what you mean")
            .parse_expense_text(" bought flour ")
            .await;
        assert_eq!(parsed, ParsedExpense::fallback("bought flour"));
    }

    #[tokio::test]
    async fn test_parse_falls_back_on_model_error() {
        let parsed = failing().parse_expense_text("rent 12000").await;
        assert_eq!(parsed, ParsedExpense::fallback("rent 12000"));
    }

    #[tokio::test]
    async fn test_canned_mock_parse() {
        let assistant = ExpenseAssistant::new(Some(AIClient::mock()));
        let parsed = assistant.parse_expense_text("Paid 500 for electricity bill").await;
        assert_eq!(parsed.amount(), Some(500.0));
        assert_eq!(parsed.category(), Some(ExpenseCategory::Electricity.as_str()));
    }

    #[tokio::test]
    async fn test_insights_without_credential() {
        let text = "2024-05-01 | Rent | 1000 | shop\n\n2024-05-02 | Misc | 20 | tea\n";
        let out = ExpenseAssistant::disabled().generate_insights(text).await;
        assert_eq!(
            out,
            "Insights are not yet powered by real AI.\nTotal records considered:\n2 expense rows."
        );
    }

    #[tokio::test]
    async fn test_insights_on_model_error() {
        let out = failing().generate_insights("a\nb\n   \nc").await;
        assert_eq!(
            out,
            "AI insights are temporarily unavailable (model error).\nTotal records considered:\n3 expense rows."
        );
    }

    #[tokio::test]
    async fn test_insights_return_raw_text() {
        let out = scripted("  - Rent dominates.\n").generate_insights("x").await;
        assert_eq!(out, "  - Rent dominates.\n");
    }

    #[test]
    fn test_count_rows_ignores_blank_lines() {
        assert_eq!(count_rows(""), 0);
        assert_eq!(count_rows("\n \n"), 0);
        assert_eq!(count_rows("one\n\ntwo\n"), 2);
    }

    #[test]
    fn test_insights_cutoff() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(insights_cutoff(today), NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
    }

    #[test]
    fn test_format_insight_lines() {
        let expenses = vec![
            Expense {
                id: 2,
                user_id: 1,
                date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                amount: 12.5,
                category: ExpenseCategory::StockPurchase,
                description: "flour".to_string(),
            },
            Expense {
                id: 1,
                user_id: 1,
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                amount: 1000.0,
                category: ExpenseCategory::Rent,
                description: String::new(),
            },
        ];
        assert_eq!(
            format_insight_lines(&expenses),
            "2024-03-02 | Stock purchase | 12.5 | flour\n2024-03-01 | Rent | 1000 | "
        );
    }

    #[test]
    fn test_from_config() {
        assert!(!ExpenseAssistant::from_config(&AiConfig::disabled()).is_enabled());
        let mock = ExpenseAssistant::from_config(&AiConfig::mock());
        assert_eq!(mock.backend_name(), Some("mock"));
        assert_eq!(mock.model(), Some("mock"));
    }
}

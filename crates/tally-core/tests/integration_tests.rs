//! Integration tests for tally-core
//!
//! These tests exercise the register → record → insights workflow and the
//! Gemini backend against a local mock server.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde_json::json;
use tally_core::{
    assistant::insights_cutoff,
    db::Database,
    format_insight_lines,
    test_utils::MockGeminiServer,
    AIBackend, AIClient, AiConfig, BackendKind, ExpenseAssistant, ExpenseCategory, NewExpense,
    ParsedExpense,
};

fn expense(date: NaiveDate, amount: f64, category: &str, description: &str) -> NewExpense {
    NewExpense::from_raw(
        Some(&date.format("%Y-%m-%d").to_string()),
        Some(&json!(amount)),
        Some(category),
        Some(description),
    )
    .expect("valid expense")
}

fn gemini_config(host: &str) -> AiConfig {
    AiConfig {
        backend: BackendKind::Gemini,
        api_key: Some("test-key".to_string()),
        model: "gemini-2.5-flash".to_string(),
        host: host.to_string(),
        timeout: Duration::from_secs(5),
    }
}

// =============================================================================
// Database Integration Tests
// =============================================================================

#[tokio::test]
async fn test_full_expense_workflow() {
    let db = Database::in_memory().expect("Failed to create in-memory database");

    let owner = db.create_user("Owner@Shop.example", "hunter2").unwrap();
    let other = db.create_user("other@shop.example", "pw").unwrap();
    assert_eq!(owner.email, "owner@shop.example");

    let today = Utc::now().date_naive();
    db.insert_expense(owner.id, &expense(today, 1200.0, "Rent", "shop rent"))
        .unwrap();
    db.insert_expense(
        owner.id,
        &expense(today - chrono::Duration::days(3), 80.5, "Electricity", "meter"),
    )
    .unwrap();
    db.insert_expense(
        owner.id,
        &expense(today - chrono::Duration::days(45), 300.0, "Stock purchase", "old stock"),
    )
    .unwrap();
    db.insert_expense(other.id, &expense(today, 5.0, "Misc", "not yours"))
        .unwrap();

    let all = db.list_expenses(owner.id).unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|e| e.user_id == owner.id));

    let recent = db
        .list_expenses_since(owner.id, insights_cutoff(today))
        .unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].category, ExpenseCategory::Rent);

    let lines = format_insight_lines(&recent);
    let out = ExpenseAssistant::disabled().generate_insights(&lines).await;
    assert!(out.ends_with("\n2 expense rows."));

    // Logging back in resolves to the same user
    let user = db.authenticate("OWNER@shop.example ", "hunter2").unwrap();
    let token = db
        .create_session(user.id, chrono::Duration::days(1))
        .unwrap();
    let session = db.find_session(&token).unwrap().unwrap();
    assert_eq!(session.user_id, owner.id);
}

#[tokio::test]
async fn test_mock_backend_workflow() {
    let db = Database::in_memory().unwrap();
    let user = db.create_user("baker@example.com", "pw").unwrap();
    let assistant = ExpenseAssistant::from_config(&AiConfig::mock());

    let parsed = assistant
        .parse_expense_text("Paid 450 rent for the stall")
        .await;
    assert_eq!(parsed.category(), Some("Rent"));

    let new = NewExpense::from_raw(
        Some("2024-06-01"),
        parsed.get("amount"),
        parsed.category(),
        parsed.description(),
    )
    .unwrap();
    db.insert_expense(user.id, &new).unwrap();

    let stored = db.list_expenses(user.id).unwrap();
    assert_eq!(stored[0].amount, 450.0);
    assert_eq!(stored[0].description, "Paid 450 rent for the stall");
}

// =============================================================================
// Gemini Backend Tests (mock HTTP server)
// =============================================================================

#[tokio::test]
async fn test_gemini_backend_round_trip() {
    let server = MockGeminiServer::with_text("- Rent is your largest cost.").await;
    let client = AIClient::from_config(&gemini_config(&server.url())).unwrap();

    assert!(client.health_check().await);
    assert_eq!(
        client.generate("hello").await.unwrap(),
        "- Rent is your largest cost."
    );

    let assistant = ExpenseAssistant::new(Some(client));
    let out = assistant
        .generate_insights("2024-06-01 | Rent | 450 | stall")
        .await;
    assert_eq!(out, "- Rent is your largest cost.");
}

#[tokio::test]
async fn test_gemini_embedded_json_is_extracted() {
    let server = MockGeminiServer::with_text(
        r#"Sure! {"amount":500,"category":"Electricity","description":"bill"} thanks"#,
    )
    .await;
    let assistant = ExpenseAssistant::from_config(&gemini_config(&server.url()));

    let parsed = assistant
        .parse_expense_text("Paid 500 for electricity bill")
        .await;
    assert_eq!(parsed.amount(), Some(500.0));
    assert_eq!(parsed.category(), Some("Electricity"));
    assert_eq!(parsed.description(), Some("bill"));
}

#[tokio::test]
async fn test_gemini_http_error_falls_back() {
    let server = MockGeminiServer::with_status(500).await;
    let assistant = ExpenseAssistant::from_config(&gemini_config(&server.url()));

    let parsed = assistant.parse_expense_text("  tea for staff ").await;
    assert_eq!(parsed, ParsedExpense::fallback("tea for staff"));

    let out = assistant.generate_insights("a\nb").await;
    assert_eq!(
        out,
        "AI insights are temporarily unavailable (model error).\nTotal records considered:\n2 expense rows."
    );
}

#[tokio::test]
async fn test_gemini_unreachable_host_falls_back() {
    let mut config = gemini_config("http://127.0.0.1:1");
    config.timeout = Duration::from_millis(500);
    let assistant = ExpenseAssistant::from_config(&config);

    let parsed = assistant.parse_expense_text("").await;
    assert_eq!(parsed.description(), Some("No description"));
}

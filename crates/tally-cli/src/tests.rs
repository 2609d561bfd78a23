//! CLI command tests

use clap::Parser;
use serde_json::json;
use tally_core::db::Database;
use tally_core::{AIClient, ExpenseAssistant, MockBackend, NewExpense};

use crate::cli::{Cli, Commands};
use crate::commands;

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn add_expense(db: &Database, user_id: i64, days_ago: i64, amount: f64) {
    let date = chrono::Utc::now().date_naive() - chrono::Duration::days(days_ago);
    let expense = NewExpense::from_raw(
        Some(&date.format("%Y-%m-%d").to_string()),
        Some(&json!(amount)),
        Some("Misc"),
        Some("test"),
    )
    .unwrap();
    db.insert_expense(user_id, &expense).unwrap();
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_cli_defaults() {
    let cli = Cli::try_parse_from(["tally", "serve"]).unwrap();
    assert_eq!(cli.db.to_str(), Some("tally.db"));
    assert!(!cli.verbose);
    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
            session_ttl_days,
            secure_cookies,
        } => {
            assert_eq!(port, 3000);
            assert_eq!(host, "127.0.0.1");
            assert!(static_dir.is_none());
            assert_eq!(session_ttl_days, 30);
            assert!(!secure_cookies);
        }
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_cli_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["tally", "insights", "--email", "a@b.c", "--db", "x.db", "-v"])
        .unwrap();
    assert_eq!(cli.db.to_str(), Some("x.db"));
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Insights { ref email } if email == "a@b.c"));
}

#[test]
fn test_cli_session_ttl_range() {
    for bad in ["0", "-5", "3651", "1000000000"] {
        assert!(
            Cli::try_parse_from(["tally", "serve", "--session-ttl-days", bad]).is_err(),
            "accepted {}",
            bad
        );
    }

    let cli = Cli::try_parse_from(["tally", "serve", "--session-ttl-days", "3650"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Serve { session_ttl_days: 3650, .. }
    ));
}

#[tokio::test]
async fn test_cmd_serve_rejects_out_of_range_ttl() {
    let result = commands::cmd_serve(
        std::path::Path::new("unused.db"),
        ExpenseAssistant::disabled(),
        "127.0.0.1",
        0,
        None,
        1_000_000_000,
        false,
    )
    .await;
    assert!(result.is_err());
}

#[test]
fn test_cli_parse_requires_text() {
    assert!(Cli::try_parse_from(["tally", "parse"]).is_err());
}

// ========== Command Tests ==========

#[test]
fn test_cmd_users() {
    let db = setup_test_db();
    assert!(commands::cmd_users(&db).is_ok());

    let user = db.create_user("owner@shop.example", "pw").unwrap();
    add_expense(&db, user.id, 0, 5.0);
    assert!(commands::cmd_users(&db).is_ok());
}

#[tokio::test]
async fn test_cmd_parse_disabled() {
    let result = commands::cmd_parse(&ExpenseAssistant::disabled(), "rent 100").await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_insights_for_user_uses_last_30_days() {
    let db = setup_test_db();
    let user = db.create_user("owner@shop.example", "pw").unwrap();
    add_expense(&db, user.id, 1, 5.0);
    add_expense(&db, user.id, 30, 6.0);
    add_expense(&db, user.id, 31, 7.0);

    let (count, insights) =
        commands::insights_for_user(&db, &ExpenseAssistant::disabled(), "Owner@Shop.example")
            .await
            .unwrap();
    assert_eq!(count, 2);
    assert!(insights.ends_with("\n2 expense rows."));
}

#[tokio::test]
async fn test_insights_for_user_returns_model_text() {
    let db = setup_test_db();
    db.create_user("owner@shop.example", "pw").unwrap();
    let assistant =
        ExpenseAssistant::new(Some(AIClient::Mock(MockBackend::with_response("- Spend less."))));

    let (count, insights) = commands::insights_for_user(&db, &assistant, "owner@shop.example")
        .await
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(insights, "- Spend less.");
}

#[tokio::test]
async fn test_cmd_insights_unknown_user() {
    let db = setup_test_db();
    let result = commands::cmd_insights(&db, &ExpenseAssistant::disabled(), "ghost@x.com").await;
    assert!(result.is_err());
}

#[test]
fn test_open_db_creates_schema() {
    let path = std::env::temp_dir().join(format!("tally_cli_test_{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);

    assert!(commands::cmd_init(&path).is_ok());
    let db = commands::open_db(&path).unwrap();
    assert!(db.list_users_with_counts().unwrap().is_empty());

    drop(db);
    let _ = std::fs::remove_file(&path);
}

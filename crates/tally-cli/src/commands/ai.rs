//! AI commands: run the expense parser and insights outside the web UI

use anyhow::{Context, Result};
use chrono::Utc;
use tally_core::assistant::insights_cutoff;
use tally_core::db::Database;
use tally_core::{format_insight_lines, ExpenseAssistant};

pub async fn cmd_parse(assistant: &ExpenseAssistant, text: &str) -> Result<()> {
    if !assistant.is_enabled() {
        println!("💡 AI not configured, showing the fallback result");
    }

    let parsed = assistant.parse_expense_text(text).await;
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

/// Insights text for a user's recent expenses
pub async fn insights_for_user(
    db: &Database,
    assistant: &ExpenseAssistant,
    email: &str,
) -> Result<(usize, String)> {
    let user = db
        .find_user_by_email(email)?
        .with_context(|| format!("No user registered with email {}", email.trim()))?;

    let cutoff = insights_cutoff(Utc::now().date_naive());
    let expenses = db.list_expenses_since(user.id, cutoff)?;
    let insights = assistant
        .generate_insights(&format_insight_lines(&expenses))
        .await;

    Ok((expenses.len(), insights))
}

pub async fn cmd_insights(db: &Database, assistant: &ExpenseAssistant, email: &str) -> Result<()> {
    let (count, insights) = insights_for_user(db, assistant, email).await?;

    println!("📊 Insights for {} ({} expenses in the last 30 days)", email.trim(), count);
    println!("   ─────────────────────────────");
    println!("{}", insights);
    Ok(())
}

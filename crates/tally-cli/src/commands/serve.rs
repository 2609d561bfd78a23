//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::db::MAX_SESSION_TTL_DAYS;
use tally_core::ExpenseAssistant;
use tally_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    assistant: ExpenseAssistant,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    session_ttl_days: i64,
    secure_cookies: bool,
) -> Result<()> {
    anyhow::ensure!(
        (1..=MAX_SESSION_TTL_DAYS).contains(&session_ttl_days),
        "--session-ttl-days must be between 1 and {}",
        MAX_SESSION_TTL_DAYS
    );

    println!("🚀 Starting Tally web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    match (assistant.backend_name(), assistant.model()) {
        (Some(backend), Some(model)) => println!("   🤖 AI: {} ({})", backend, model),
        _ => println!("   💡 Tip: Set GEMINI_API_KEY to enable AI parsing and insights"),
    }

    let db = open_db(db_path)?;

    let config = ServerConfig {
        session_ttl_days,
        secure_cookies,
        ..Default::default()
    };

    let static_dir = match static_dir {
        Some(dir) => Some(
            dir.to_str()
                .with_context(|| format!("Static dir is not valid UTF-8: {}", dir.display()))?,
        ),
        None => None,
    };

    tally_server::serve_with_config(db, assistant, host, port, static_dir, config).await
}

//! Core command implementations and shared utilities

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::db::Database;

/// Open (or create) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    println!("   Schema ready in {}", db.path());

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Set GEMINI_API_KEY (or add it to .env) to enable AI features");
    println!("  2. Start web UI: tally serve --static-dir static");

    Ok(())
}

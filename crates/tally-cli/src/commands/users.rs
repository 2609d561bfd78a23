//! User listing command

use anyhow::Result;
use tally_core::db::Database;

pub fn cmd_users(db: &Database) -> Result<()> {
    let users = db.list_users_with_counts()?;

    if users.is_empty() {
        println!("No users registered yet.");
        return Ok(());
    }

    println!("👤 Users ({})", users.len());
    println!("   ─────────────────────────────");
    for (user, expenses) in &users {
        println!(
            "   {:<32} {:>5} expenses  since {}",
            user.email,
            expenses,
            user.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

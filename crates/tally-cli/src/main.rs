//! Tally CLI - Expense tracker with AI-assisted entry
//!
//! Usage:
//!   tally init                       Initialize database
//!   tally serve --port 3000          Start web server
//!   tally parse "Paid 500 for rent"  Try the AI expense parser
//!   tally insights --email EMAIL     Insights for a user's last 30 days
//!   tally users                      List registered users

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tally_core::{AiConfig, ExpenseAssistant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            static_dir,
            session_ttl_days,
            secure_cookies,
        } => {
            commands::cmd_serve(
                &cli.db,
                assistant_from_env(),
                &host,
                port,
                static_dir.as_deref(),
                session_ttl_days,
                secure_cookies,
            )
            .await
        }
        Commands::Parse { text } => commands::cmd_parse(&assistant_from_env(), &text).await,
        Commands::Insights { email } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_insights(&db, &assistant_from_env(), &email).await
        }
        Commands::Users => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_users(&db)
        }
    }
}

/// AI settings are read from the environment exactly once per process
fn assistant_from_env() -> ExpenseAssistant {
    ExpenseAssistant::from_config(&AiConfig::from_env())
}

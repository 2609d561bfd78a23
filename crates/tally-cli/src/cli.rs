//! CLI argument definitions using clap
//!
//! This module contains the clap structs for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_core::db::{DEFAULT_SESSION_TTL_DAYS, MAX_SESSION_TTL_DAYS};

/// Tally - Expense tracking with AI-assisted entry and insights
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Multi-user expense tracker with AI parsing and insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory served under /static (front-end script)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Login session lifetime in days (1 to 3650)
        #[arg(
            long,
            default_value_t = DEFAULT_SESSION_TTL_DAYS,
            value_parser = clap::value_parser!(i64).range(1..=MAX_SESSION_TTL_DAYS)
        )]
        session_ttl_days: i64,

        /// Mark the session cookie Secure (use behind HTTPS)
        #[arg(long)]
        secure_cookies: bool,
    },

    /// Parse free text into an expense using the configured AI backend
    Parse {
        /// Text to parse, e.g. "Paid 500 for electricity bill"
        text: String,
    },

    /// Generate spending insights for a user's last 30 days
    Insights {
        /// Email of the user
        #[arg(short, long)]
        email: String,
    },

    /// List registered users with their expense counts
    Users,
}

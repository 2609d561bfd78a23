//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db)
//! - `ai` - Expense parsing and insights from the command line
//! - `serve` - Web server command
//! - `users` - User listing

pub mod ai;
pub mod core;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use ai::*;
pub use core::*;
pub use serve::*;
pub use users::*;

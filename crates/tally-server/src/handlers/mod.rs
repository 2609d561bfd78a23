//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific area.

pub mod ai;
pub mod auth;
pub mod expenses;
pub mod health;

// Re-export all handlers for use in router
pub use ai::*;
pub use auth::*;
pub use expenses::*;
pub use health::*;

//! Server-side login sessions
//!
//! A session is identified by a random 256-bit token handed to the browser.
//! Only the SHA-256 digest of the token is persisted, so a leaked database
//! does not yield usable cookies.

use chrono::{Duration, Utc};
use rand::RngCore;
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::Session;

/// Default session lifetime
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

/// Longest session lifetime accepted from configuration
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

impl Database {
    /// Create a session for `user_id` and return the raw cookie token
    pub fn create_session(&self, user_id: i64, ttl: Duration) -> Result<String> {
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| Error::Validation("Session lifetime is out of range".into()))?;
        let token = generate_token();

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?, ?, ?)",
            params![token_digest(&token), user_id, format_datetime(expires_at)],
        )?;

        debug!(user_id, "Session created");
        Ok(token)
    }

    /// Resolve a cookie token to its live session, if any
    pub fn find_session(&self, token: &str) -> Result<Option<Session>> {
        let conn = self.conn()?;
        let session = conn
            .query_row(
                r#"
                SELECT s.user_id, u.email, s.expires_at
                FROM sessions s
                JOIN users u ON u.id = s.user_id
                WHERE s.token_hash = ? AND s.expires_at > ?
                "#,
                params![token_digest(token), format_datetime(Utc::now())],
                |row| {
                    let expires_at: String = row.get(2)?;
                    Ok(Session {
                        user_id: row.get(0)?,
                        email: row.get(1)?,
                        expires_at: parse_datetime(&expires_at),
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    /// Delete a session; returns whether one existed
    pub fn delete_session(&self, token: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?",
            params![token_digest(token)],
        )?;
        Ok(deleted > 0)
    }

    /// Remove all expired sessions, returning how many were removed
    pub fn purge_expired_sessions(&self) -> Result<usize> {
        let conn = self.conn()?;
        let purged = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?",
            params![format_datetime(Utc::now())],
        )?;
        Ok(purged)
    }
}

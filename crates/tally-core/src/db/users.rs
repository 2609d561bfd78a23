//! User operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;
use crate::password;

/// Trim and lower-case an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Database {
    /// Register a new user
    ///
    /// The email is normalized first. Empty credentials are rejected with
    /// `Error::Validation`, a taken email with `Error::Duplicate`.
    pub fn create_user(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(Error::Validation("Email and password required".into()));
        }

        if self.find_user_by_email(&email)?.is_some() {
            return Err(Error::Duplicate("Email already registered".into()));
        }

        let hash = password::hash_password(password)?;
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO users (email, password_hash) VALUES (?, ?)",
            params![email, hash],
        );

        match inserted {
            Ok(_) => {}
            // Lost a race with a concurrent registration of the same email
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(Error::Duplicate("Email already registered".into()));
            }
            Err(e) => return Err(e.into()),
        }

        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }

    /// Check credentials and return the matching user
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let invalid = || Error::Auth("Invalid email or password".into());

        let user = self.find_user_by_email(&email)?.ok_or_else(invalid)?;
        if !password::verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }
        Ok(user)
    }

    /// Look up a user by (normalized) email
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
                params![normalize_email(email)],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, password_hash, created_at FROM users WHERE id = ?",
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users with their expense counts, oldest first
    pub fn list_users_with_counts(&self) -> Result<Vec<(User, i64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT u.id, u.email, u.password_hash, u.created_at, COUNT(e.id)
            FROM users u
            LEFT JOIN expenses e ON e.user_id = u.id
            GROUP BY u.id
            ORDER BY u.id
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| Ok((Self::row_to_user(row)?, row.get(4)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let created_at: String = row.get(3)?;
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            created_at: parse_datetime(&created_at),
        })
    }
}

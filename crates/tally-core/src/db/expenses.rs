//! Expense operations
//!
//! Every query here is scoped by `user_id`; there is no cross-user access path.

use chrono::NaiveDate;
use rusqlite::params;
use rusqlite::types::Type;
use rusqlite::Error::FromSqlConversionFailure;

use super::Database;
use crate::error::Result;
use crate::models::{Expense, ExpenseCategory, NewExpense};

const EXPENSE_COLUMNS: &str = "id, user_id, date, amount, category, description";

impl Database {
    /// Insert an expense owned by `user_id`, returning the new ID
    pub fn insert_expense(&self, user_id: i64, expense: &NewExpense) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO expenses (user_id, date, amount, category, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                expense.date.to_string(),
                expense.amount,
                expense.category.as_str(),
                expense.description,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's expenses, newest date first
    ///
    /// Expenses sharing a date are ordered by insertion, newest first.
    pub fn list_expenses(&self, user_id: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE user_id = ? ORDER BY date DESC, id DESC",
            EXPENSE_COLUMNS
        ))?;
        let expenses = stmt
            .query_map(params![user_id], Self::row_to_expense)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(expenses)
    }

    /// List a user's expenses dated on or after `since`, newest date first
    pub fn list_expenses_since(&self, user_id: i64, since: NaiveDate) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE user_id = ? AND date >= ? ORDER BY date DESC, id DESC",
            EXPENSE_COLUMNS
        ))?;
        let expenses = stmt
            .query_map(params![user_id, since.to_string()], Self::row_to_expense)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(expenses)
    }

    /// Count a user's expenses
    pub fn count_expenses(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Map a row, failing on a stored date or category that does not parse
    fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        let date_str: String = row.get(2)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
        let category_str: String = row.get(4)?;
        let category = category_str
            .parse::<ExpenseCategory>()
            .map_err(|e| FromSqlConversionFailure(4, Type::Text, e.into()))?;
        Ok(Expense {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date,
            amount: row.get(3)?,
            category,
            description: row.get(5)?,
        })
    }
}

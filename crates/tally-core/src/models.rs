//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fallback description used when free text is empty
pub const NO_DESCRIPTION: &str = "No description";

/// Expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    #[serde(rename = "Stock purchase")]
    StockPurchase,
    Electricity,
    Rent,
    Salary,
    Misc,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StockPurchase => "Stock purchase",
            Self::Electricity => "Electricity",
            Self::Rent => "Rent",
            Self::Salary => "Salary",
            Self::Misc => "Misc",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [ExpenseCategory] {
        &[
            Self::StockPurchase,
            Self::Electricity,
            Self::Rent,
            Self::Salary,
            Self::Misc,
        ]
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stock purchase" | "stock_purchase" | "stock" => Ok(Self::StockPurchase),
            "electricity" => Ok(Self::Electricity),
            "rent" => Ok(Self::Rent),
            "salary" => Ok(Self::Salary),
            "misc" => Ok(Self::Misc),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    /// Trimmed, lower-cased email
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A stored expense
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: String,
}

/// A validated expense ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: String,
}

impl NewExpense {
    /// Validate raw request fields into an insertable expense
    ///
    /// `amount` may be a JSON number or a numeric string (HTML form values
    /// arrive as strings). It must be finite and positive.
    pub fn from_raw(
        date: Option<&str>,
        amount: Option<&serde_json::Value>,
        category: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self> {
        let date_str = date
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Validation("date is required".into()))?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
            Error::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", date_str))
        })?;

        let amount = match amount {
            Some(serde_json::Value::Number(n)) => n.as_f64(),
            Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| Error::Validation("amount must be a number".into()))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::Validation("amount must be greater than zero".into()));
        }

        let category = category
            .ok_or_else(|| Error::Validation("category is required".into()))?
            .parse::<ExpenseCategory>()
            .map_err(Error::Validation)?;

        Ok(Self {
            date,
            amount,
            category,
            description: description.unwrap_or_default().trim().to_string(),
        })
    }
}

/// Expense fields extracted from free text by the AI parser
///
/// Holds the JSON object exactly as the model returned it. Nothing is
/// checked: `category` may be outside [`ExpenseCategory`], `amount` may be a
/// string or negative, and any field may be missing or extra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedExpense(serde_json::Map<String, serde_json::Value>);

impl ParsedExpense {
    /// Wrap a parsed JSON object
    pub fn from_object(object: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(object)
    }

    /// Deterministic result used when the model is unavailable or misbehaves
    pub fn fallback(text: &str) -> Self {
        let trimmed = text.trim();
        let description = if trimmed.is_empty() {
            NO_DESCRIPTION
        } else {
            trimmed
        };
        let mut object = serde_json::Map::new();
        object.insert("amount".into(), serde_json::Value::from(0));
        object.insert(
            "category".into(),
            serde_json::Value::from(ExpenseCategory::Misc.as_str()),
        );
        object.insert("description".into(), serde_json::Value::from(description));
        Self(object)
    }

    /// Raw value of a field
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// `amount` as a number, accepting numeric strings
    pub fn amount(&self) -> Option<f64> {
        match self.get("amount")? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.get("category")?.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")?.as_str()
    }

    pub fn as_object(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }
}

/// A live session resolved from a cookie token
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

//! Mock backend for testing
//!
//! By default it answers the two Tally prompts with plausible canned output
//! derived from the prompt itself. It can also be scripted to return a fixed
//! response or to fail, which is how the fallback paths are exercised.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AIBackend;

#[derive(Clone, Debug, Default)]
enum MockMode {
    /// Keyword heuristics over the prompt
    #[default]
    Canned,
    /// Always return this text
    Scripted(String),
    /// Always fail with this message
    Failing(String),
}

/// Mock AI backend for testing
#[derive(Clone, Debug, Default)]
pub struct MockBackend {
    mode: MockMode,
}

impl MockBackend {
    /// Create a mock backend with canned responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock backend that always returns `response`
    pub fn with_response(response: &str) -> Self {
        Self {
            mode: MockMode::Scripted(response.to_string()),
        }
    }

    /// Create a mock backend whose calls always fail
    pub fn failing(message: &str) -> Self {
        Self {
            mode: MockMode::Failing(message.to_string()),
        }
    }
}

/// Pull the quoted user text out of the parse prompt
fn extract_user_text(prompt: &str) -> Option<&str> {
    let start = prompt.find("User text: \"")? + "User text: \"".len();
    let rest = &prompt[start..];
    let end = rest.find("\"\n").unwrap_or(rest.len());
    Some(&rest[..end])
}

fn canned_parse(text: &str) -> String {
    let lower = text.to_lowercase();
    let category = if lower.contains("electric") || lower.contains("power") {
        "Electricity"
    } else if lower.contains("rent") {
        "Rent"
    } else if lower.contains("salary") || lower.contains("wage") {
        "Salary"
    } else if lower.contains("stock") || lower.contains("supplier") || lower.contains("bought") {
        "Stock purchase"
    } else {
        "Misc"
    };

    let amount = text
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .find_map(|tok| tok.trim_matches('.').parse::<f64>().ok())
        .unwrap_or(0.0);

    serde_json::json!({
        "amount": amount,
        "category": category,
        "description": text.trim(),
    })
    .to_string()
}

fn canned_insights(prompt: &str) -> String {
    let rows = prompt
        .lines()
        .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()) && l.matches(" | ").count() >= 3)
        .count();
    format!(
        "- You recorded {} expenses in the last 30 days.\n\
         - Check which category takes the biggest share.\n\
         - Compare supplier prices before restocking.",
        rows
    )
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match &self.mode {
            MockMode::Scripted(response) => Ok(response.clone()),
            MockMode::Failing(message) => Err(Error::Ai(message.clone())),
            MockMode::Canned => match extract_user_text(prompt) {
                Some(text) => Ok(canned_parse(text)),
                None => Ok(canned_insights(prompt)),
            },
        }
    }

    async fn health_check(&self) -> bool {
        !matches!(self.mode, MockMode::Failing(_))
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

//! Prompt templates for the AI features
//!
//! Templates live in `prompts/*.md` at the repository root and are compiled
//! into the binary. Placeholders use `{{name}}` syntax.

use std::collections::HashMap;

/// Embedded prompt templates
mod defaults {
    pub const PARSE_EXPENSE: &str = include_str!("../../../prompts/parse_expense.md");
    pub const EXPENSE_INSIGHTS: &str = include_str!("../../../prompts/expense_insights.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Free text -> `{amount, category, description}` JSON
    ParseExpense,
    /// Last 30 days of expenses -> bullet-point insights
    ExpenseInsights,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseExpense => "parse_expense",
            Self::ExpenseInsights => "expense_insights",
        }
    }

    pub fn all() -> &'static [PromptId] {
        &[Self::ParseExpense, Self::ExpenseInsights]
    }

    /// The raw template text
    pub fn template(&self) -> &'static str {
        match self {
            Self::ParseExpense => defaults::PARSE_EXPENSE,
            Self::ExpenseInsights => defaults::EXPENSE_INSIGHTS,
        }
    }

    /// Render the template, replacing each `{{key}}` with its value
    ///
    /// Unknown placeholders are left untouched.
    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        let mut out = self.template().to_string();
        for (key, value) in vars {
            out = out.replace(&format!("{{{{{}}}}}", key), value);
        }
        out
    }
}

/// Build the expense-parsing prompt for a piece of free text
pub fn parse_expense_prompt(text: &str) -> String {
    let mut vars = HashMap::new();
    vars.insert("text", text);
    PromptId::ParseExpense.render(&vars)
}

/// Build the insights prompt for pre-formatted expense lines
pub fn insights_prompt(expenses_text: &str) -> String {
    let mut vars = HashMap::new();
    vars.insert("expenses", expenses_text);
    PromptId::ExpenseInsights.render(&vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_have_placeholders() {
        assert!(PromptId::ParseExpense.template().contains("{{text}}"));
        assert!(PromptId::ExpenseInsights.template().contains("{{expenses}}"));
    }

    #[test]
    fn test_parse_prompt_embeds_text_and_categories() {
        let prompt = parse_expense_prompt("Paid 500 for electricity bill");
        assert!(prompt.contains("User text: \"Paid 500 for electricity bill\""));
        assert!(!prompt.contains("{{text}}"));
        for cat in crate::models::ExpenseCategory::all() {
            assert!(prompt.contains(cat.as_str()), "missing {}", cat);
        }
    }

    #[test]
    fn test_insights_prompt_embeds_lines() {
        let lines = "2024-01-01 | Rent | 1000 | shop rent";
        let prompt = insights_prompt(lines);
        assert!(prompt.contains(lines));
        assert!(prompt.contains("3-5 short bullet points"));
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: std::collections::HashSet<_> =
            PromptId::all().iter().map(|p| p.as_str()).collect();
        assert_eq!(ids.len(), PromptId::all().len());
    }
}

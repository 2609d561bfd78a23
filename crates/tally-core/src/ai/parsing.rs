//! JSON parsing helpers for AI backend responses
//!
//! Models often wrap the requested JSON in commentary or code fences. The
//! recovery here is a heuristic: when the trimmed text does not start with
//! `{`, everything from the first `{` to the last `}` is taken. Nested or
//! multiple objects in the surrounding text can defeat it.

use crate::error::{Error, Result};
use crate::models::ParsedExpense;

/// Truncate long responses for error messages
fn truncate_for_error(s: &str) -> String {
    if s.len() > 200 {
        let cut = (0..=200).rev().find(|i| s.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &s[..cut])
    } else {
        s.to_string()
    }
}

/// Isolate the JSON object candidate in a model response
///
/// The response is trimmed. If it already starts with `{` it is returned
/// as-is, otherwise the slice from the first `{` through the last `}` is
/// returned. When no such pair exists the trimmed text comes back unchanged.
pub fn extract_json_object(response: &str) -> &str {
    let content = response.trim();
    if content.starts_with('{') {
        return content;
    }

    match (content.find('{'), content.rfind('}')) {
        (Some(s), Some(e)) if s < e => &content[s..=e],
        _ => content,
    }
}

/// Parse an expense-extraction response into its fields
///
/// Any JSON object is accepted and returned as-is. Field presence, types and
/// values are left to the caller.
pub fn parse_expense_response(response: &str) -> Result<ParsedExpense> {
    let json_str = extract_json_object(response);
    if !json_str.starts_with('{') {
        return Err(Error::InvalidData(format!(
            "No JSON found in AI response | Raw: {}",
            truncate_for_error(response.trim())
        )));
    }

    let value: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid expense JSON from AI: {} | Raw: {}",
            e,
            truncate_for_error(json_str)
        ))
    })?;

    match value {
        serde_json::Value::Object(object) => Ok(ParsedExpense::from_object(object)),
        _ => Err(Error::InvalidData(format!(
            "AI response is not a JSON object | Raw: {}",
            truncate_for_error(json_str)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_object() {
        let raw = "  {\"a\":1}\n";
        assert_eq!(extract_json_object(raw), "{\"a\":1}");
    }

    #[test]
    fn test_extract_from_surrounding_text() {
        let raw = r#"Sure! {"amount":500,"category":"Electricity","description":"bill"} thanks"#;
        assert_eq!(
            extract_json_object(raw),
            r#"{"amount":500,"category":"Electricity","description":"bill"}"#
        );
    }

    #[test]
    fn test_extract_from_code_fence() {
        let raw = "```json\n{\"amount\": 1}\n```";
        assert_eq!(extract_json_object(raw), "{\"amount\": 1}");
    }

    #[test]
    fn test_extract_without_braces_returns_trimmed() {
        assert_eq!(extract_json_object("  no json here "), "no json here");
        assert_eq!(extract_json_object("} backwards {"), "} backwards {");
    }

    #[test]
    fn test_parse_embedded_response() {
        let raw = r#"Sure! {"amount":500,"category":"Electricity","description":"bill"} thanks"#;
        let parsed = parse_expense_response(raw).unwrap();
        assert_eq!(parsed.amount(), Some(500.0));
        assert_eq!(parsed.category(), Some("Electricity"));
        assert_eq!(parsed.description(), Some("bill"));
    }

    #[test]
    fn test_parse_passes_values_through_unchecked() {
        let raw = r#"{"amount":-42.5,"category":"Groceries","description":"veg"}"#;
        let parsed = parse_expense_response(raw).unwrap();
        assert_eq!(parsed.amount(), Some(-42.5));
        assert_eq!(parsed.category(), Some("Groceries"));
    }

    #[test]
    fn test_parse_keeps_string_amount_and_missing_fields() {
        let raw = r#"{"amount":"500","category":"Electricity","description":"bill"}"#;
        let parsed = parse_expense_response(raw).unwrap();
        assert_eq!(parsed.get("amount"), Some(&serde_json::json!("500")));
        assert_eq!(parsed.amount(), Some(500.0));

        let partial = parse_expense_response(r#"{"category":"Misc"}"#).unwrap();
        assert_eq!(partial.category(), Some("Misc"));
        assert_eq!(partial.amount(), None);
        assert_eq!(partial.description(), None);

        let empty = parse_expense_response("{}").unwrap();
        assert!(empty.as_object().is_empty());
    }

    #[test]
    fn test_leading_object_with_trailing_text_is_not_sliced() {
        // Only responses that do not start with `{` are sliced
        let raw = r#"{"amount":1,"category":"Misc","description":"x"} hope this helps"#;
        assert!(parse_expense_response(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_expense_response("I could not understand that.").is_err());
        assert!(parse_expense_response("{\"amount\": 5,").is_err());
        assert!(parse_expense_response("[1, 2]").is_err());
        assert!(parse_expense_response("").is_err());
    }

    #[test]
    fn test_nested_braces_in_commentary_defeat_slicing() {
        let raw = r#"Result: {"amount":5,"category":"Misc","description":"x"} (see {note})"#;
        assert!(parse_expense_response(raw).is_err());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(150);
        let out = truncate_for_error(&long);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}

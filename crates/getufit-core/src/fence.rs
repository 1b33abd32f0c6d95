//! De-fencing parser for JSON embedded in Markdown code fences.
//!
//! The coach and retrieval services wrap machine-readable JSON inside
//! triple-backtick fences in otherwise free-text replies. The contract is
//! fragile by nature, so extraction is a total function: any input yields
//! either parsed JSON or an explicit error, never a panic.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Strip a leading fence marker (with or without a language tag) and a
/// trailing fence marker, returning the remainder.
///
/// Text that carries no fence at all is returned as-is; whether the
/// remainder is valid JSON is the caller's problem. Prose surrounding the
/// fence is deliberately not handled — the upstream contract says the fence
/// is the whole message, and anything else should fail the JSON parse.
pub fn strip_fences(text: &str) -> &str {
    let mut rest = text.trim();
    if let Some(after) = rest.strip_prefix("```") {
        // Drop the rest of the fence line, which may carry a language tag
        // ("json", "JSON", ...) or nothing.
        rest = match after.find('\n') {
            Some(pos) => &after[pos + 1..],
            None => after,
        };
    }
    rest = rest.trim_end();
    if let Some(before) = rest.strip_suffix("```") {
        rest = before;
    }
    rest.trim()
}

/// Whether a reply opens with a fenced `json` block.
///
/// The personal bot uses this to decide between structured rendering and
/// raw text.
pub fn starts_with_json_fence(text: &str) -> bool {
    text.trim_start().starts_with("```json")
}

/// De-fence and parse into a concrete type.
pub fn parse_fenced<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_fences(text))
}

/// De-fence and parse into a raw JSON value.
///
/// The plan view uses this so the object it forwards to the ingestion
/// endpoint is exactly what the service produced, unknown fields included.
pub fn parse_fenced_value(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(strip_fences(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::FitnessPlan;

    #[test]
    fn test_strip_json_fence() {
        let text = "```json\n{\"activities\": []}\n```";
        assert_eq!(strip_fences(text), "{\"activities\": []}");
    }

    #[test]
    fn test_strip_bare_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_uppercase_language_tag() {
        let text = "```JSON\n{}\n```";
        assert_eq!(strip_fences(text), "{}");
    }

    #[test]
    fn test_unfenced_text_passes_through() {
        assert_eq!(strip_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_fences("just prose"), "just prose");
    }

    #[test]
    fn test_trailing_whitespace_after_fence() {
        let text = "```json\n{\"a\": 1}\n```   \n";
        assert_eq!(strip_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn test_missing_closing_fence() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(strip_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_fenced_plan() {
        let text = "```json\n{\"activities\":[{\"day\":\"Mon\",\"focus\":\"Legs\",\"exercises\":[]}],\"fitness_goal\":\"strength\",\"nutrition\":\"eat well\"}\n```";
        let plan: FitnessPlan = parse_fenced(text).unwrap();
        assert_eq!(plan.activities.len(), 1);
        assert_eq!(plan.activities[0].day, "Mon");
        assert_eq!(plan.nutrition.as_deref(), Some("eat well"));
    }

    #[test]
    fn test_parse_failures_are_errors_not_panics() {
        assert!(parse_fenced_value("").is_err());
        assert!(parse_fenced_value("```json\nnot json\n```").is_err());
        assert!(parse_fenced_value("Here is your plan: ```json\n{}\n```").is_err());
    }

    #[test]
    fn test_json_fence_detection() {
        assert!(starts_with_json_fence("```json\n[]\n```"));
        assert!(starts_with_json_fence("  ```json\n[]\n```"));
        assert!(!starts_with_json_fence("```\n[]\n```"));
        assert!(!starts_with_json_fence("plain reply"));
    }
}

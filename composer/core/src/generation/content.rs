//! Message Content Shape
//!
//! The `{subject, body}` payload every generation call resolves to, the
//! deterministic fallback template used when no model succeeds, and a
//! tolerant parser for model output that arrives wrapped in markdown fences
//! or surrounding prose.

use serde::{Deserialize, Serialize};

/// A drafted message: subject line and ready-to-send body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageContent {
    /// Subject line
    pub subject: String,
    /// Ready-to-send body text
    pub body: String,
}

impl MessageContent {
    /// Build the fixed-template fallback for a recipient.
    ///
    /// Same shape as a genuine success so downstream consumers need no
    /// branching logic. Deterministic: identical inputs yield identical
    /// output.
    #[must_use]
    pub fn fallback(recipient_name: &str, context: &str, sender_name: &str) -> Self {
        Self {
            subject: format!("Hello {recipient_name}"),
            body: format!("Dear {recipient_name},\n\n{context}\n\nBest regards,\n{sender_name}"),
        }
    }

    /// Serialize to the JSON string handed back to callers
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("MessageContent serialization cannot fail")
    }

    /// Parse model output into content, tolerating formatting noise.
    ///
    /// Strict decoding first; if that fails, the first balanced `{...}` span
    /// is extracted (string- and escape-aware) and decoded instead. Returns
    /// `None` when no decodable object is present or either field is empty.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let content: Self = serde_json::from_str(text.trim())
            .ok()
            .or_else(|| serde_json::from_str(extract_object(text)?).ok())?;

        if content.subject.trim().is_empty() || content.body.trim().is_empty() {
            None
        } else {
            Some(content)
        }
    }
}

/// Find the first balanced `{...}` span in `text`.
///
/// Tracks brace depth while skipping string literals and escape sequences,
/// so braces inside generated body text do not confuse the scan.
fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fallback_is_deterministic() {
        let a = MessageContent::fallback("Jane", "merry christmas", "Sam");
        let b = MessageContent::fallback("Jane", "merry christmas", "Sam");
        assert_eq!(a.to_json(), b.to_json());
    }

    #[test]
    fn test_fallback_embeds_inputs() {
        let content = MessageContent::fallback("Jane Doe", "our meeting next week", "Sam");
        assert_eq!(content.subject, "Hello Jane Doe");
        assert!(content.body.contains("Dear Jane Doe,"));
        assert!(content.body.contains("our meeting next week"));
        assert!(content.body.ends_with("Best regards,\nSam"));
    }

    #[test]
    fn test_parse_strict_json() {
        let content = MessageContent::parse(r#"{"subject":"S","body":"B"}"#).unwrap();
        assert_eq!(content.subject, "S");
        assert_eq!(content.body, "B");
    }

    #[test]
    fn test_parse_markdown_fenced_json() {
        let text = "```json\n{\"subject\":\"S\",\"body\":\"B\"}\n```";
        let content = MessageContent::parse(text).unwrap();
        assert_eq!(content.subject, "S");
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let text = "Here is your email:\n{\"subject\":\"S\",\"body\":\"B\"}\nHope it helps!";
        assert!(MessageContent::parse(text).is_some());
    }

    #[test]
    fn test_parse_braces_inside_strings() {
        let text = r#"noise {"subject":"re: {urgent}","body":"see { and } above"} trailer"#;
        let content = MessageContent::parse(text).unwrap();
        assert_eq!(content.subject, "re: {urgent}");
        assert_eq!(content.body, "see { and } above");
    }

    #[test]
    fn test_parse_escaped_quotes() {
        let text = r#"{"subject":"a \"quoted\" word","body":"B"}"#;
        let content = MessageContent::parse(text).unwrap();
        assert_eq!(content.subject, "a \"quoted\" word");
    }

    #[test]
    fn test_parse_rejects_empty_fields() {
        assert!(MessageContent::parse(r#"{"subject":"","body":"B"}"#).is_none());
        assert!(MessageContent::parse(r#"{"subject":"S","body":"  "}"#).is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(MessageContent::parse("no json here").is_none());
        assert!(MessageContent::parse("{unbalanced").is_none());
        assert!(MessageContent::parse("").is_none());
    }

    #[test]
    fn test_parse_rejects_extra_keys() {
        let text = r#"{"subject":"S","body":"B","footer":"F"}"#;
        assert!(MessageContent::parse(text).is_none());
    }

    #[test]
    fn test_extract_object_nested() {
        let text = r#"x {"a": {"b": 1}} y"#;
        assert_eq!(extract_object(text), Some(r#"{"a": {"b": 1}}"#));
    }
}

//! Prompt Construction
//!
//! Combines the configured base instruction with the per-message recipient,
//! context, and sender, and pins down the output contract: a raw JSON object
//! with `subject` and `body` keys and nothing else.

/// Output-format instruction appended to every prompt.
///
/// Models love wrapping JSON in markdown fences; this is the counterweight.
/// `MessageContent::parse` still tolerates noise for the models that ignore
/// it.
const FORMAT_INSTRUCTION: &str = "IMPORTANT: Return ONLY a raw JSON object with keys 'subject' \
    and 'body'. Do not include any markdown formatting (like ```json), explanations, or \
    templates. The 'body' should be the ready-to-send email content.";

/// Build the full prompt for one generation attempt
#[must_use]
pub fn build_prompt(base_prompt: &str, recipient_name: &str, context: &str, sender_name: &str) -> String {
    format!(
        "{base_prompt}\n\n\
         Recipient Name: {recipient_name}\n\
         Context: {context}\n\
         Sender Name: {sender_name}\n\n\
         {FORMAT_INSTRUCTION}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_embeds_all_fields() {
        let prompt = build_prompt(
            "Draft a professional email.",
            "Jane Doe",
            "our scheduled meeting",
            "Sam",
        );

        assert!(prompt.starts_with("Draft a professional email.\n\n"));
        assert!(prompt.contains("Recipient Name: Jane Doe\n"));
        assert!(prompt.contains("Context: our scheduled meeting\n"));
        assert!(prompt.contains("Sender Name: Sam\n"));
        assert!(prompt.ends_with(FORMAT_INSTRUCTION));
    }

    #[test]
    fn test_build_prompt_demands_raw_json() {
        let prompt = build_prompt("base", "r", "c", "s");
        assert!(prompt.contains("ONLY a raw JSON object"));
        assert!(prompt.contains("'subject'"));
        assert!(prompt.contains("'body'"));
    }
}

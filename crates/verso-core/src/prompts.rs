//! Instruction templates for the two turn kinds.

/// Template prepended to the first prompt of a session.
pub const INITIAL_PROMPT_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/initial_prompt.md"
));

/// Template prepended to every refinement prompt.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/feedback_prompt.md"
));

/// Builds the first-turn prompt: instruction template + raw user text.
///
/// The text is passed through as-is; no escaping or length limits.
pub fn build_initial_prompt(user_text: &str) -> String {
    format!("{} {}", INITIAL_PROMPT_TEMPLATE.trim(), user_text)
}

/// Builds a refinement prompt for adjusting the previous response.
pub fn build_feedback_prompt(user_text: &str) -> String {
    format!("{} {}", FEEDBACK_PROMPT_TEMPLATE.trim(), user_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_prompt_prepends_template() {
        let prompt = build_initial_prompt("generate 2 random numbers");
        assert!(prompt.ends_with(": generate 2 random numbers"));
        assert!(prompt.starts_with("Respond to the following prompt"));
    }

    #[test]
    fn feedback_prompt_prepends_template() {
        let prompt = build_feedback_prompt("improve efficiency");
        assert!(prompt.ends_with(": improve efficiency"));
        assert!(prompt.starts_with("Adjust the previous code"));
    }

    #[test]
    fn user_text_is_not_escaped() {
        let prompt = build_initial_prompt("a \"quoted\" request\nwith a newline");
        assert!(prompt.contains("a \"quoted\" request\nwith a newline"));
    }
}

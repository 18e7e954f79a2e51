//! Fenced code block extraction from model output.
//!
//! Model responses wrap generated source in a markdown fence. This module
//! locates the first fenced block and reports its absence explicitly instead
//! of slicing blindly.

/// The triple-backtick delimiter marking code block boundaries.
const FENCE: &str = "```";

/// A fenced code block found in model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    /// Language tag on the opening fence, if any (e.g. "python").
    pub language: Option<&'a str>,
    /// Content between the fences, including the trailing newline.
    pub code: &'a str,
}

/// Extracts the first fenced code block from `text`.
///
/// The opening fence may carry a language tag; the block runs until the next
/// fence marker, or to the end of input when the block is unterminated.
/// When more than one block is present, the first wins regardless of its
/// language tag. Returns `None` when no fence is present.
pub fn extract_code_block(text: &str) -> Option<CodeBlock<'_>> {
    let open = text.find(FENCE)?;
    let after_open = &text[open + FENCE.len()..];

    // Opening fence line: optional language tag up to the newline.
    // A fence with no newline after it has no content.
    let (language, body) = match after_open.find('\n') {
        Some(nl) => {
            let tag = after_open[..nl].trim();
            let language = (!tag.is_empty()).then_some(tag);
            (language, &after_open[nl + 1..])
        }
        None => (None, ""),
    };

    let code = match body.find(FENCE) {
        Some(close) => &body[..close],
        None => body,
    };

    Some(CodeBlock { language, code })
}

/// Returns the first fenced block's content, or the raw text when no fence
/// is present. This is the display form used by the session front-ends.
pub fn code_or_raw(text: &str) -> &str {
    match extract_code_block(text) {
        Some(block) => block.code,
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_python_block_between_fences() {
        let block = extract_code_block("prefix```python\nCODE\n```suffix").unwrap();
        assert_eq!(block.language, Some("python"));
        assert_eq!(block.code, "CODE\n");
    }

    #[test]
    fn no_fence_reports_none() {
        assert_eq!(extract_code_block("plain text, no code"), None);
    }

    #[test]
    fn code_or_raw_falls_back_to_input() {
        assert_eq!(code_or_raw("plain text, no code"), "plain text, no code");
    }

    #[test]
    fn untagged_fence_has_no_language() {
        let block = extract_code_block("```\nprint('hi')\n```").unwrap();
        assert_eq!(block.language, None);
        assert_eq!(block.code, "print('hi')\n");
    }

    #[test]
    fn first_block_wins_over_later_blocks() {
        let text = "```python\nfirst\n```\nmiddle\n```rust\nsecond\n```";
        let block = extract_code_block(text).unwrap();
        assert_eq!(block.language, Some("python"));
        assert_eq!(block.code, "first\n");
    }

    #[test]
    fn unterminated_block_runs_to_end() {
        let block = extract_code_block("```python\nno closing fence").unwrap();
        assert_eq!(block.code, "no closing fence");
    }

    #[test]
    fn non_python_tag_is_still_extracted() {
        let block = extract_code_block("```rust\nfn main() {}\n```").unwrap();
        assert_eq!(block.language, Some("rust"));
        assert_eq!(block.code, "fn main() {}\n");
    }

    #[test]
    fn fence_without_newline_is_empty() {
        let block = extract_code_block("text ```").unwrap();
        assert_eq!(block.language, None);
        assert_eq!(block.code, "");
    }
}

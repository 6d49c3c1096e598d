//! Extraction of the user-facing portion of a raw LLM reply.
//!
//! Replies are expected to wrap the feedback in `<feedback>...</feedback>`.
//! Parsing is lenient: when the tag is absent the raw reply is returned
//! unchanged, so benign model formatting drift never hard-fails a request.

const OPEN_TAG: &str = "<feedback>";
const CLOSE_TAG: &str = "</feedback>";

/// Extract the first `<feedback>` block, trimmed. `None` if no complete
/// tag pair is present.
pub fn extract_feedback(text: &str) -> Option<&str> {
    let start = text.find(OPEN_TAG)? + OPEN_TAG.len();
    let end = text[start..].find(CLOSE_TAG)? + start;
    Some(text[start..end].trim())
}

/// Extract the tagged feedback, falling back to the raw reply when the tag
/// is missing.
pub fn parse_reply(text: &str) -> String {
    match extract_feedback(text) {
        Some(feedback) => feedback.to_string(),
        None => {
            tracing::warn!("reply contained no <feedback> tag, returning raw text");
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_trims_tagged_text() {
        assert_eq!(
            extract_feedback("blah <feedback>Good job!</feedback> blah"),
            Some("Good job!")
        );
        assert_eq!(
            extract_feedback("<feedback>\n  Nice try.\n</feedback>"),
            Some("Nice try.")
        );
    }

    #[test]
    fn spans_multiple_lines() {
        let reply = "<feedback>Correct!\nThe answer is indeed 4.</feedback>";
        assert_eq!(
            extract_feedback(reply),
            Some("Correct!\nThe answer is indeed 4.")
        );
    }

    #[test]
    fn takes_first_block_when_repeated() {
        let reply = "<feedback>first</feedback> <feedback>second</feedback>";
        assert_eq!(extract_feedback(reply), Some("first"));
    }

    #[test]
    fn missing_tag_yields_none() {
        assert_eq!(extract_feedback("no tags here"), None);
        assert_eq!(extract_feedback("<feedback>never closed"), None);
        assert_eq!(extract_feedback("never opened</feedback>"), None);
    }

    #[test]
    fn lenient_fallback_returns_raw_text_unchanged() {
        let raw = "  The model forgot the tag.  ";
        assert_eq!(parse_reply(raw), raw);
    }

    #[test]
    fn lenient_path_still_extracts_when_tagged() {
        assert_eq!(parse_reply("x <feedback> ok </feedback> y"), "ok");
    }
}

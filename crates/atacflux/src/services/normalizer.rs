//! Response Normalizer
//!
//! Best-effort recovery when the model ignores "no backticks, no preamble".
//! This is a heuristic, not markdown parsing: a leading fence drops the whole
//! first line, a trailing fence is cut, and any prose before the first `{` is
//! discarded. Keep it behind `normalize_response` so a structured-output
//! contract can replace it later.

const FENCE: &str = "```";

/// Strip fences and leading prose from the model's raw answer
pub fn normalize_response(raw: &str) -> String {
    let mut text = raw.trim();

    if text.starts_with(FENCE) {
        // No newline means the fence line is the whole answer
        text = text.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    }
    if let Some(stripped) = text.strip_suffix(FENCE) {
        text = stripped;
    }
    text = text.trim();

    if !text.starts_with('{') {
        if let Some(start) = text.find('{') {
            text = &text[start..];
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_is_untouched() {
        let raw = r#"{"bullets": []}"#;
        assert_eq!(normalize_response(raw), raw);
    }

    #[test]
    fn test_json_fence_is_removed() {
        let raw = "```json\n{\"bullets\": []}\n```";
        assert_eq!(normalize_response(raw), "{\"bullets\": []}");
    }

    #[test]
    fn test_bare_fence_with_surrounding_whitespace() {
        let raw = "\n  ```\n  {\"a\": 1}\n```  \n";
        assert_eq!(normalize_response(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_leading_fence_drops_whole_first_line() {
        // Content on the fence line goes with it
        let raw = "```{\"lost\": true}\n{\"kept\": true}\n```";
        assert_eq!(normalize_response(raw), "{\"kept\": true}");
    }

    #[test]
    fn test_fence_without_newline_empties_text() {
        assert_eq!(normalize_response("```{\"a\": 1}"), "");
    }

    #[test]
    fn test_leading_prose_is_discarded() {
        let raw = "Here is the analysis you asked for:\n{\"bullets\": []}";
        assert_eq!(normalize_response(raw), "{\"bullets\": []}");
    }

    #[test]
    fn test_prose_inside_fence_is_discarded() {
        let raw = "```\nSure! {\"a\": 1}\n```";
        assert_eq!(normalize_response(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_text_without_brace_is_returned_trimmed() {
        assert_eq!(normalize_response("  I cannot help with that.  "), "I cannot help with that.");
    }

    #[test]
    fn test_trailing_prose_is_kept() {
        let raw = "{\"a\": 1}\nHope this helps!";
        assert_eq!(normalize_response(raw), raw);
    }
}

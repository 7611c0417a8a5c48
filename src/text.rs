//! Text helpers for building prompt context and reading model output.

/// Appended whenever `truncate_text` cuts a string.
pub const TRUNCATION_MARKER: &str = "...";

const SENTENCE_ENDINGS: [&str; 3] = [". ", "! ", "? "];

/// Truncate `text` to at most `max_chars` characters (before the marker).
///
/// Cuts at the last sentence boundary inside the budget, keeping the
/// punctuation. Falls back to the last space, then to a hard cut.
/// Text already within budget is returned unchanged.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let cut = match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => byte_idx,
        None => return text.to_string(),
    };
    let truncated = &text[..cut];

    let sentence_end = SENTENCE_ENDINGS
        .iter()
        .filter_map(|ending| truncated.rfind(ending))
        .max();
    if let Some(idx) = sentence_end {
        return format!("{}{}", &truncated[..idx + 1], TRUNCATION_MARKER);
    }

    if let Some(idx) = truncated.rfind(' ') {
        return format!("{}{}", &truncated[..idx], TRUNCATION_MARKER);
    }

    format!("{}{}", truncated, TRUNCATION_MARKER)
}

/// Pull the JSON object out of a completion.
///
/// Models often wrap JSON in a Markdown fence or add a sentence around it.
/// Returns the span from the first `{` to the last `}`, or the trimmed input
/// when there is no such span (so the parser reports the real problem).
pub fn extract_json_object(text: &str) -> &str {
    let trimmed = text.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_len(s: &str) -> usize {
        s.strip_suffix(TRUNCATION_MARKER).unwrap_or(s).chars().count()
    }

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(truncate_text("Short text.", 500), "Short text.");
        assert_eq!(truncate_text("", 10), "");
    }

    #[test]
    fn test_exact_length_unchanged() {
        let text = "a".repeat(20);
        assert_eq!(truncate_text(&text, 20), text);
    }

    #[test]
    fn test_idempotent_on_short_input() {
        let once = truncate_text("Rust is fast. It is safe.", 100);
        assert_eq!(truncate_text(&once, 100), once);
    }

    #[test]
    fn test_cuts_at_sentence_boundary() {
        let text = "First sentence. Second sentence. Third sentence is long";
        let result = truncate_text(text, 40);

        assert_eq!(result, "First sentence. Second sentence....");
        assert!(body_len(&result) <= 40);
    }

    #[test]
    fn test_last_boundary_of_any_kind_wins() {
        let text = "Is it fast? Yes. It really is! And more words follow here";
        let result = truncate_text(text, 35);

        assert_eq!(result, "Is it fast? Yes. It really is!...");
    }

    #[test]
    fn test_falls_back_to_word_boundary() {
        let text = "no sentence punctuation anywhere in this text";
        let result = truncate_text(text, 20);

        assert_eq!(result, "no sentence...");
        assert!(body_len(&result) <= 20);
    }

    #[test]
    fn test_hard_cut_without_spaces() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let result = truncate_text(text, 10);

        assert_eq!(result, "abcdefghij...");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "ééééééééééé";
        let result = truncate_text(text, 5);

        assert_eq!(result, "ééééé...");
        assert_eq!(body_len(&result), 5);
    }

    #[test]
    fn test_never_exceeds_budget() {
        let text = "Lorem ipsum dolor sit amet. Consectetur adipiscing elit! Sed do? Eiusmod tempor";
        for max in 1..text.len() {
            let result = truncate_text(text, max);
            assert!(body_len(&result) <= max, "budget {} exceeded: {}", max, result);
        }
    }

    #[test]
    fn test_extract_json_from_fence() {
        let raw = "```json\n{\"search_queries\": [\"a\"], \"reasoning\": \"r\"}\n```";
        assert_eq!(
            extract_json_object(raw),
            "{\"search_queries\": [\"a\"], \"reasoning\": \"r\"}"
        );
    }

    #[test]
    fn test_extract_json_passthrough() {
        assert_eq!(extract_json_object("  not json  "), "not json");
        assert_eq!(extract_json_object("{}"), "{}");
    }
}

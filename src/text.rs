//! Text helpers shared by the extraction tiers and conflict rules.
//!
//! All offsets passed in are UTF-8 byte offsets (as produced by `regex`);
//! all lengths are counted in characters so slicing never splits a code point.

use std::sync::LazyLock;

use regex::Regex;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"));

/// Collapse runs of whitespace to a single space and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Slice of `text` extending up to `before` characters ahead of the byte
/// range `[start, end)` and up to `after` characters past it.
///
/// `start` and `end` must lie on character boundaries.
pub fn context_window(text: &str, start: usize, end: usize, before: usize, after: usize) -> &str {
    let start = start.min(text.len());
    let end = end.clamp(start, text.len());

    let window_start = text[..start]
        .char_indices()
        .rev()
        .nth(before.saturating_sub(1))
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let window_start = if before == 0 { start } else { window_start };

    let window_end = text[end..]
        .char_indices()
        .nth(after)
        .map(|(idx, _)| end + idx)
        .unwrap_or(text.len());

    &text[window_start..window_end]
}

/// Split text into sentences on `.`, `!` or `?` followed by whitespace
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK.split(text).collect()
}

/// True if `haystack` contains any of the keywords
pub fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b   c "), "a b c");
    }

    #[test]
    fn test_truncate_chars_respects_code_points() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 200), "short");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_context_window() {
        let text = "0123456789TIME0123456789";
        let start = text.find("TIME").unwrap();
        let end = start + 4;

        assert_eq!(context_window(text, start, end, 3, 2), "789TIME01");
        assert_eq!(context_window(text, start, end, 100, 100), text);
        assert_eq!(context_window(text, start, end, 0, 0), "TIME");
    }

    #[test]
    fn test_context_window_multibyte() {
        let text = "ééé8:40 PMééé";
        let start = text.find("8:40").unwrap();
        let end = start + "8:40 PM".len();
        assert_eq!(context_window(text, start, end, 1, 1), "é8:40 PMé");
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("He entered. She left! Why? done");
        assert_eq!(sentences, vec!["He entered", "She left", "Why", "done"]);

        // No break without trailing whitespace (e.g. decimals)
        assert_eq!(split_sentences("3.5 km away"), vec!["3.5 km away"]);
    }
}

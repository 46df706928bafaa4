//! Source classification and description synthesis for text-derived events.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::text::{context_window, contains_any, normalize_whitespace, split_sentences, truncate_chars};

/// Longest description attached to an event
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Category used when no keyword set matches
pub const DEFAULT_SOURCE: &str = "Document";

/// Keyword sets in priority order; first match wins
const SOURCE_KEYWORDS: &[(&str, &[&str])] = &[
    ("CCTV", &["cctv", "camera", "surveillance", "footage"]),
    ("Witness", &["witness", "statement", "saw", "heard", "observed"]),
    (
        "Medical",
        &["medical", "hospital", "injury", "laceration", "fracture", "examination"],
    ),
    ("Police", &["police", "officer", "investigation", "memo", "fir"]),
];

/// Action phrases that make a sentence a good event description, in order
static ACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(entered|enters|went into|arrived at)\s+([^.]{0,100})",
        r"(exited|exits|left|departed)\s+([^.]{0,100})",
        r"(altercation|argument|conflict|incident)\s+([^.]{0,100})",
        r"(sustained|received|suffered)\s+(injury|injuries|damage)\s+([^.]{0,100})",
        r"(wearing|wore)\s+([^.]{0,100})",
        r"(heard|saw|observed|witnessed)\s+([^.]{0,100})",
    ]
    .iter()
    .map(|pattern| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("valid action pattern")
    })
    .collect()
});

/// Refined source category for a context window
pub fn classify_source(context: &str) -> &'static str {
    let lowered = context.to_lowercase();
    SOURCE_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&lowered, keywords))
        .map(|(name, _)| *name)
        .unwrap_or(DEFAULT_SOURCE)
}

/// Concise description for the clock time `time_str` found in `context`.
///
/// The first action pattern present in the context selects the sentence that
/// mentions the time or the action; otherwise the first sentence with the time;
/// otherwise the context itself. Always at most 200 characters.
pub fn describe_event(context: &str, time_str: &str) -> String {
    let sentences = split_sentences(context);

    for pattern in ACTION_PATTERNS.iter() {
        if !pattern.is_match(context) {
            continue;
        }
        let chosen = sentences
            .iter()
            .find(|sentence| sentence.contains(time_str) || pattern.is_match(sentence));
        if let Some(sentence) = chosen {
            let desc = normalize_whitespace(sentence);
            return truncate_chars(&desc, MAX_DESCRIPTION_CHARS).to_string();
        }
    }

    if let Some(sentence) = sentences.iter().find(|s| s.contains(time_str)) {
        return truncate_chars(sentence.trim(), MAX_DESCRIPTION_CHARS).to_string();
    }

    truncate_chars(context, MAX_DESCRIPTION_CHARS).to_string()
}

/// First sentence of the ±100 character neighbourhood of a time mention
pub fn find_time_context(text: &str, time_str: &str) -> String {
    let needle = match RegexBuilder::new(&regex::escape(time_str))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return format!("Event at {}", time_str),
    };

    match needle.find(text) {
        Some(found) => {
            let context = context_window(text, found.start(), found.end(), 100, 100).trim();
            let first = split_sentences(context).into_iter().next().unwrap_or(context);
            truncate_chars(first, 150).to_string()
        }
        None => format!("Event at {}", time_str),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_source_priority() {
        assert_eq!(classify_source("CCTV camera shows the witness"), "CCTV");
        assert_eq!(classify_source("The witness heard shouting"), "Witness");
        assert_eq!(classify_source("Hospital admitted the victim"), "Medical");
        assert_eq!(classify_source("Officer on duty logged it"), "Police");
        assert_eq!(classify_source("He bought bread"), DEFAULT_SOURCE);
    }

    #[test]
    fn test_describe_prefers_action_sentence() {
        let context = "Receipt printed. At 8:12 PM the man entered ABC Supermarket. Nothing else";
        assert_eq!(
            describe_event(context, "8:12 PM"),
            "At 8:12 PM the man entered ABC Supermarket"
        );
    }

    #[test]
    fn test_describe_falls_back_to_time_sentence() {
        let context = "Lights went off. Power returned at 9:05 PM! Calm after";
        assert_eq!(describe_event(context, "9:05 PM"), "Power returned at 9:05 PM");
    }

    #[test]
    fn test_describe_falls_back_to_context() {
        let context = "x".repeat(250);
        assert_eq!(describe_event(&context, "1:00 PM").len(), 200);
    }

    #[test]
    fn test_find_time_context() {
        let text = "Report. The alarm rang at 20:15 in the hall. Staff responded";
        assert_eq!(find_time_context(text, "20:15"), "Report");
        assert_eq!(find_time_context(text, "21:00"), "Event at 21:00");
    }
}

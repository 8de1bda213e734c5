// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic phrase extraction from free-text prompts.
//!
//! A small ordered set of heuristics pulls a short, template-friendly
//! phrase out of whatever the user typed. Fully deterministic: same input,
//! same phrase.

/// Phrase used when nothing usable can be extracted.
pub const DEFAULT_TOPIC: &str = "your latest update";

/// Maximum words kept in an extracted phrase.
const MAX_PHRASE_WORDS: usize = 6;

/// Markers tried in order; the text following the first match wins.
const LEAD_MARKERS: &[&str] = &["about ", "topic:", "for "];

/// Extract a short topic phrase from a free-text prompt.
///
/// Tries, in order: text following "about", text following "topic:", text
/// following "for", else the first few words. The result is trimmed of
/// surrounding punctuation and capped at [`MAX_PHRASE_WORDS`] words; if
/// nothing survives, [`DEFAULT_TOPIC`] is returned.
pub fn extract_topic_phrase(prompt: &str) -> String {
    let lower = prompt.to_lowercase();

    for marker in LEAD_MARKERS {
        if let Some(pos) = lower.find(marker) {
            // Byte offsets in the lowercased copy can drift from the
            // original for a handful of Unicode characters; `get` rejects
            // a non-boundary slice instead of panicking.
            let Some(tail) = prompt.get(pos + marker.len()..) else {
                continue;
            };
            let phrase = first_words(tail);
            if !phrase.is_empty() {
                return phrase;
            }
        }
    }

    let phrase = first_words(prompt);
    if phrase.is_empty() {
        DEFAULT_TOPIC.to_string()
    } else {
        phrase
    }
}

/// Derive a single hashtag-friendly token from a topic phrase.
///
/// Lowercased alphanumerics of the phrase words, concatenated and capped
/// at 24 characters; `"content"` when nothing survives.
pub fn hashtag_token(phrase: &str) -> String {
    let token: String = phrase
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .take(24)
        .collect();
    if token.is_empty() {
        "content".to_string()
    } else {
        token
    }
}

fn first_words(text: &str) -> String {
    let words: Vec<&str> = text
        .split_whitespace()
        .take(MAX_PHRASE_WORDS)
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_after_about() {
        assert_eq!(
            extract_topic_phrase("write a post about morning coffee rituals"),
            "morning coffee rituals"
        );
    }

    #[test]
    fn extracts_text_after_topic_marker() {
        assert_eq!(
            extract_topic_phrase("topic: sustainable fashion trends"),
            "sustainable fashion trends"
        );
    }

    #[test]
    fn extracts_text_after_for() {
        assert_eq!(
            extract_topic_phrase("a caption for our new product launch"),
            "our new product launch"
        );
    }

    #[test]
    fn about_takes_precedence_over_for() {
        assert_eq!(
            extract_topic_phrase("a thread for devs about rust lifetimes"),
            "rust lifetimes"
        );
    }

    #[test]
    fn falls_back_to_first_words() {
        assert_eq!(
            extract_topic_phrase("remote work productivity tips"),
            "remote work productivity tips"
        );
    }

    #[test]
    fn caps_phrase_length() {
        let phrase = extract_topic_phrase("one two three four five six seven eight");
        assert_eq!(phrase, "one two three four five six");
    }

    #[test]
    fn strips_surrounding_punctuation() {
        assert_eq!(extract_topic_phrase("about \"coffee!\""), "coffee");
    }

    #[test]
    fn empty_prompt_yields_default() {
        assert_eq!(extract_topic_phrase(""), DEFAULT_TOPIC);
        assert_eq!(extract_topic_phrase("  !!! "), DEFAULT_TOPIC);
    }

    #[test]
    fn extraction_is_deterministic() {
        let a = extract_topic_phrase("a post about winter skincare");
        let b = extract_topic_phrase("a post about winter skincare");
        assert_eq!(a, b);
    }

    #[test]
    fn hashtag_token_is_alphanumeric_lowercase() {
        assert_eq!(hashtag_token("Morning Coffee Rituals!"), "morningcoffeerituals");
        assert_eq!(hashtag_token("???"), "content");
    }
}

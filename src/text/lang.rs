//! Language detection (spec §4.1): returns `"en"` iff at least 10% of the first 100
//! tokens of length >= 3 appear in a fixed English function-word list, else `"unknown"`.

use once_cell::sync::Lazy;
use std::collections::HashSet;

const SAMPLE_SIZE: usize = 100;
const EN_THRESHOLD: f64 = 0.10;

const EN_FUNCTION_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her",
    "was", "one", "our", "out", "day", "get", "has", "him", "his", "how", "man", "new",
    "now", "old", "see", "two", "way", "who", "boy", "did", "its", "let", "put", "say",
    "she", "too", "use", "that", "this", "with", "from", "have", "will", "your", "what",
    "when", "where", "which", "their", "about", "would", "there", "could", "other",
];

static EN_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| EN_FUNCTION_WORDS.iter().copied().collect());

/// Detects whether `text` looks like English, per the function-word-ratio heuristic.
pub fn detect_language(text: &str) -> &'static str {
    let sample: Vec<String> = crate::text::tokenize::tokenize(text)
        .into_iter()
        .filter(|t| t.len() >= 3)
        .take(SAMPLE_SIZE)
        .collect();

    if sample.is_empty() {
        return "unknown";
    }

    let hits = sample.iter().filter(|t| EN_SET.contains(t.as_str())).count();
    let ratio = hits as f64 / sample.len() as f64;

    if ratio >= EN_THRESHOLD { "en" } else { "unknown" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english_text() {
        let text = "The quick brown fox and the lazy dog were walking with their friends about town";
        assert_eq!(detect_language(text), "en");
    }

    #[test]
    fn detects_non_english_as_unknown() {
        let text = "Der schnelle braune Fuchs springt uber den faulen Hund heute Morgen wieder";
        assert_eq!(detect_language(text), "unknown");
    }

    #[test]
    fn empty_text_is_unknown() {
        assert_eq!(detect_language(""), "unknown");
    }
}

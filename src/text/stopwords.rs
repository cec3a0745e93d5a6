//! Stop-word set. Loaded once at startup (one term per line, spec §6) and shared
//! immutably afterward; falls back to a compiled-in default on any I/O error.

use std::collections::HashSet;
use std::path::Path;

const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can't", "cannot", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "few", "for",
    "from", "further", "had", "hadn't", "has", "hasn't", "have", "haven't", "having", "he",
    "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in",
    "into", "is", "isn't", "it", "its", "itself", "let's", "me", "more", "most", "mustn't",
    "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
    "ought", "our", "ours", "ourselves", "out", "over", "own", "same", "shan't", "she",
    "should", "shouldn't", "so", "some", "such", "than", "that", "that's", "the", "their",
    "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we", "were",
    "weren't", "what", "when", "where", "which", "while", "who", "whom", "why", "with",
    "won't", "would", "wouldn't", "you", "your", "yours", "yourself", "yourselves",
];

pub fn default_stop_words() -> HashSet<String> {
    DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect()
}

/// Loads one term per line from `path`, falling back to the compiled-in defaults if the
/// file is missing or unreadable. Never panics.
pub fn load_stop_words(path: Option<&str>) -> HashSet<String> {
    let Some(path) = path else {
        return default_stop_words();
    };
    match std::fs::read_to_string(Path::new(path)) {
        Ok(contents) => {
            let set: HashSet<String> = contents
                .lines()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect();
            if set.is_empty() {
                default_stop_words()
            } else {
                set
            }
        }
        Err(_) => default_stop_words(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stop_words_contains_common_function_words() {
        let set = default_stop_words();
        for w in ["the", "is", "a", "and", "of"] {
            assert!(set.contains(w), "expected {w} in default stop words");
        }
    }

    #[test]
    fn load_stop_words_falls_back_on_missing_file() {
        let set = load_stop_words(Some("/nonexistent/path/stopwords.txt"));
        assert_eq!(set, default_stop_words());
    }

    #[test]
    fn load_stop_words_without_path_uses_defaults() {
        assert_eq!(load_stop_words(None), default_stop_words());
    }
}

//! Tokenization and the lightweight suffix-stripping stemmer (spec §4.1).

/// Suffixes tried longest-first; the first one that leaves a stem of >= 2 characters wins.
const SUFFIXES: &[&str] = &[
    "ical", "tion", "sion", "ness", "ment", "able", "ible", "ous", "ful", "less",
    "ish", "ive", "ing", "ed", "er", "est", "ly", "al", "ic", "ate", "ize", "ise", "ity",
];

/// Lowercases and splits on any character that is neither a letter nor a digit.
pub fn tokenize(input: &str) -> Vec<String> {
    input
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Strips the longest matching suffix from `SUFFIXES`, provided the remaining stem is
/// at least 2 characters. Then strips a trailing `s` unless the word ends in `ss`/`us`.
/// Idempotent on words that are already stemmed.
pub fn stem(word: &str) -> String {
    let mut best: Option<&str> = None;
    for suffix in SUFFIXES {
        if word.len() > suffix.len() && word.ends_with(suffix) {
            let remaining = word.len() - suffix.len();
            if remaining >= 2 && best.map_or(true, |b| suffix.len() > b.len()) {
                best = Some(suffix);
            }
        }
    }

    let mut stemmed = match best {
        Some(suffix) => word[..word.len() - suffix.len()].to_string(),
        None => word.to_string(),
    };

    if stemmed.ends_with('s') && !stemmed.ends_with("ss") && !stemmed.ends_with("us") && stemmed.len() > 2 {
        stemmed.truncate(stemmed.len() - 1);
    }

    stemmed
}

/// Tokenizes, then drops stop words (from the injected set) and tokens shorter than 3
/// characters. Used by the indexer to build the term stream for `title + " " + content`.
pub fn tokenize_for_index(text: &str, stop_words: &std::collections::HashSet<String>) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.len() >= 3 && !stop_words.contains(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::stopwords::default_stop_words;

    #[test]
    fn tokenize_lowercases_and_splits_on_punctuation() {
        let toks = tokenize("Rust's Programming-Language, v2.0!");
        assert_eq!(toks, vec!["rust", "s", "programming", "language", "v2", "0"]);
    }

    #[test]
    fn tokenize_drops_empty_runs() {
        assert_eq!(tokenize("  a   b "), vec!["a", "b"]);
    }

    #[test]
    fn stem_strips_longest_matching_suffix() {
        assert_eq!(stem("running"), "runn");
        assert_eq!(stem("classification"), "classifica");
        assert_eq!(stem("nationalization"), "nationaliza");
    }

    #[test]
    fn stem_refuses_to_strip_below_two_chars() {
        // "ed" suffix would leave "" which is < 2 chars, so no suffix strips.
        assert_eq!(stem("ed"), "ed");
        assert_eq!(stem("ally"), "al");
    }

    #[test]
    fn stem_strips_trailing_s_unless_ss_or_us() {
        assert_eq!(stem("cats"), "cat");
        assert_eq!(stem("glass"), "glass");
        assert_eq!(stem("bonus"), "bonus");
    }

    #[test]
    fn stem_is_idempotent_on_already_stemmed_tokens() {
        for w in ["run", "cat", "glass", "bonus", "comput"] {
            let once = stem(w);
            let twice = stem(&once);
            assert_eq!(once, twice, "stem should be idempotent for {w}");
        }
    }

    #[test]
    fn tokenize_for_index_drops_stopwords_and_short_tokens() {
        let stops = default_stop_words();
        let toks = tokenize_for_index("the Rust is a fast systems language", &stops);
        assert!(!toks.contains(&"the".to_string()));
        assert!(!toks.contains(&"is".to_string()));
        assert!(!toks.contains(&"a".to_string()));
        assert!(toks.contains(&"rust".to_string()));
        assert!(toks.contains(&"fast".to_string()));
        assert!(toks.contains(&"systems".to_string()));
        assert!(toks.contains(&"language".to_string()));
    }
}

//! Query analysis (spec §4.8): phrase extraction, operator substitution, stop-word
//! filtering, and synonym/stem/spell-correction expansion.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::query::fuzzy::{self, BkTree};
use crate::query::synonyms::SynonymMap;
use crate::text::tokenize::{stem, tokenize};

static PHRASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).expect("static regex is valid"));

/// The result of analyzing one raw query string: the quoted phrases kept verbatim, and
/// the expanded (deduped, order-preserving) term list used for candidate retrieval.
#[derive(Debug, Clone, Default)]
pub struct AnalyzedQuery {
    pub original: String,
    pub phrases: Vec<String>,
    pub terms: Vec<String>,
}

/// Analyzes `query` per spec §4.8. `vocabulary` is the known-word tree used for the
/// spell-corrected expansion term; pass an empty `BkTree` to skip that expansion.
pub fn analyze(query: &str, stop_words: &HashSet<String>, synonyms: &SynonymMap, vocabulary: &BkTree) -> AnalyzedQuery {
    let lowered = query.to_lowercase();
    let trimmed = lowered.trim();

    if !trimmed.contains(char::is_whitespace) && trimmed.chars().count() <= 2 && !trimmed.is_empty() {
        return AnalyzedQuery {
            original: query.to_string(),
            phrases: Vec::new(),
            terms: vec![trimmed.to_string()],
        };
    }

    let mut phrases = Vec::new();
    let mut remainder = lowered.clone();
    for caps in PHRASE_RE.captures_iter(&lowered) {
        if let Some(m) = caps.get(1) {
            let phrase = m.as_str().trim();
            if !phrase.is_empty() {
                phrases.push(phrase.to_string());
            }
        }
        if let Some(full) = caps.get(0) {
            remainder = remainder.replacen(full.as_str(), " ", 1);
        }
    }

    let remainder = remainder
        .replace(" and ", " ")
        .replace(" or ", " ")
        .replace(" not ", " -")
        .replace('+', "");

    let mut terms = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |term: String, terms: &mut Vec<String>, seen: &mut HashSet<String>| {
        if seen.insert(term.clone()) {
            terms.push(term);
        }
    };

    for phrase in &phrases {
        push(phrase.clone(), &mut terms, &mut seen);
    }

    for token in tokenize(&remainder) {
        if stop_words.contains(&token) || token.len() <= 2 {
            continue;
        }
        push(token.clone(), &mut terms, &mut seen);

        for syn in synonyms.get(&token) {
            push(syn, &mut terms, &mut seen);
        }

        if let Some(corrected) = fuzzy::correct(&token, vocabulary) {
            push(corrected, &mut terms, &mut seen);
        }

        let stemmed = stem(&token);
        if stemmed != token && stemmed.len() > 2 {
            push(stemmed, &mut terms, &mut seen);
        }
    }

    AnalyzedQuery { original: query.to_string(), phrases, terms }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::synonyms::default_synonyms;
    use crate::text::stopwords::default_stop_words;

    fn stops() -> HashSet<String> {
        default_stop_words()
    }

    #[test]
    fn short_single_token_bypasses_filtering() {
        let result = analyze("ai", &stops(), &default_synonyms(), &BkTree::new());
        assert_eq!(result.terms, vec!["ai".to_string()]);
    }

    #[test]
    fn quoted_phrase_is_kept_as_one_term() {
        let result = analyze(r#""machine learning" basics"#, &stops(), &default_synonyms(), &BkTree::new());
        assert!(result.phrases.contains(&"machine learning".to_string()));
        assert!(result.terms.contains(&"machine learning".to_string()));
        assert!(result.terms.contains(&"basics".to_string()));
    }

    #[test]
    fn stopwords_are_dropped_and_synonyms_expanded() {
        let result = analyze("the rust programming language", &stops(), &default_synonyms(), &BkTree::new());
        assert!(!result.terms.contains(&"the".to_string()));
        assert!(result.terms.contains(&"rust".to_string()));
        assert!(result.terms.contains(&"rustlang".to_string()));
    }

    #[test]
    fn operator_substitutions_apply() {
        let result = analyze("rust and programming", &stops(), &default_synonyms(), &BkTree::new());
        assert!(result.terms.contains(&"rust".to_string()));
        assert!(result.terms.contains(&"programming".to_string()));
    }

    #[test]
    fn terms_are_deduplicated() {
        let result = analyze("rust rust rust", &stops(), &default_synonyms(), &BkTree::new());
        let count = result.terms.iter().filter(|t| *t == "rust").count();
        assert_eq!(count, 1);
    }
}

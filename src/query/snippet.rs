//! Snippet selection and highlighting (spec §4.10): a sliding window over content
//! words, scored by query-term density with a positional boost toward the start.

use once_cell::sync::Lazy;
use regex::Regex;

const WINDOW_SIZE: usize = 40;
const MIN_SNIPPET_LEN: usize = 50;
const DEFAULT_MAX_LEN: usize = 280;

/// Picks the best `WINDOW_SIZE`-word window of `content` for `query_terms`, truncates
/// to `max_len`, and wraps term hits in `<b>…</b>`. Falls back to a straight prefix
/// truncation when the content is too short for a scored window to clear the minimum
/// length, or when there are no query terms to score against.
pub fn build_snippet(content: &str, query_terms: &[String], max_len: usize) -> String {
    let max_len = if max_len == 0 { DEFAULT_MAX_LEN } else { max_len };
    let content = normalize_whitespace(content);
    let words: Vec<&str> = content.split_whitespace().collect();
    if words.is_empty() {
        return String::new();
    }

    let best_window = if query_terms.is_empty() {
        words.iter().take(WINDOW_SIZE).copied().collect::<Vec<_>>().join(" ")
    } else {
        best_scored_window(&words, query_terms)
    };

    let candidate = if best_window.chars().count() >= MIN_SNIPPET_LEN {
        best_window
    } else {
        words.iter().take(WINDOW_SIZE).copied().collect::<Vec<_>>().join(" ")
    };

    let truncated = truncate_chars(&candidate, max_len);
    highlight(&truncated, query_terms)
}

fn best_scored_window(words: &[&str], query_terms: &[String]) -> String {
    let lowered_terms: Vec<String> = query_terms.iter().map(|t| t.to_lowercase()).collect();
    let mut best_score = f64::MIN;
    let mut best_start = 0;

    let step = WINDOW_SIZE.max(1) / 2;
    let mut start = 0;
    while start < words.len() {
        let end = (start + WINDOW_SIZE).min(words.len());
        let window = &words[start..end];
        let score = score_window(window, &lowered_terms);
        if score > best_score {
            best_score = score;
            best_start = start;
        }
        if end == words.len() {
            break;
        }
        start += step.max(1);
    }

    let end = (best_start + WINDOW_SIZE).min(words.len());
    words[best_start..end].join(" ")
}

fn score_window(window: &[&str], lowered_terms: &[String]) -> f64 {
    let mut score = 0.0;
    for (i, word) in window.iter().enumerate() {
        let lower = word.to_lowercase();
        let positional_boost = if i < 10 {
            1.5
        } else if i < 20 {
            1.2
        } else {
            1.0
        };
        for term in lowered_terms {
            if lower.contains(term.as_str()) {
                score += 2.0 * positional_boost;
                if lower == *term {
                    score += 5.0 * positional_boost;
                }
            }
        }
    }
    score
}

fn truncate_chars(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max_len).collect();
    format!("{truncated}…")
}

fn highlight(text: &str, query_terms: &[String]) -> String {
    let mut out = text.to_string();
    for term in query_terms {
        if term.is_empty() {
            continue;
        }
        let pattern = format!(r"(?i)\b{}\b", regex::escape(term));
        let Ok(re) = Regex::new(&pattern) else { continue };
        out = re.replace_all(&out, |caps: &regex::Captures| format!("<b>{}</b>", &caps[0])).into_owned();
    }
    out
}

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex is valid"));

/// Collapses repeated whitespace. Run on `content` before windowing so stray
/// newlines/tabs in fetched pages don't skew word boundaries.
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE_RE.replace_all(s, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_highlights_query_terms() {
        let content = "rust is a systems programming language with great tooling and a friendly community";
        let snippet = build_snippet(content, &["rust".to_string()], 200);
        assert!(snippet.contains("<b>rust</b>") || snippet.to_lowercase().contains("<b>rust</b>"));
    }

    #[test]
    fn snippet_respects_max_length() {
        let content = "word ".repeat(100);
        let snippet = build_snippet(&content, &["word".to_string()], 20);
        assert!(snippet.chars().count() <= 21); // 20 chars + ellipsis marker.
    }

    #[test]
    fn empty_content_yields_empty_snippet() {
        assert_eq!(build_snippet("", &["rust".to_string()], 100), "");
    }

    #[test]
    fn no_query_terms_still_returns_a_window() {
        let content = "some content without any particular query terms to highlight here";
        let snippet = build_snippet(content, &[], 200);
        assert!(!snippet.is_empty());
    }

    #[test]
    fn normalize_whitespace_collapses_runs_and_trims() {
        assert_eq!(normalize_whitespace("  a\tb\n\nc  "), "a b c");
    }

    #[test]
    fn build_snippet_collapses_irregular_whitespace_from_content() {
        let content = "rust   is\n\na   systems\tlanguage";
        let snippet = build_snippet(content, &["rust".to_string()], 200);
        assert!(!snippet.contains("  "), "snippet should not retain doubled whitespace");
    }
}

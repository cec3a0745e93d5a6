//! Title extraction and markup stripping (spec §4.1). Implemented as a single forward
//! scan over the raw HTML bytes rather than a DOM parse — the spec pins an exact,
//! lightweight algorithm (char iteration suppressing `<script>`/`<style>`/tag content),
//! not general HTML parsing.

const MAX_CONTENT_CHARS: usize = 50_000;

/// Reads the first `<title>…</title>` case-insensitively. Returns `None` if absent.
pub fn extract_title(html: &str) -> Option<String> {
    let lower = html.to_lowercase();
    let open = lower.find("<title")?;
    let open_close = lower[open..].find('>')? + open + 1;
    let close = lower[open_close..].find("</title>")? + open_close;
    let raw = &html[open_close..close];
    let text = collapse_whitespace(raw);
    if text.is_empty() { None } else { Some(text) }
}

/// Strips tags and `<script>`/`<style>` block content, collapses whitespace runs, and
/// truncates to `MAX_CONTENT_CHARS`.
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len().min(MAX_CONTENT_CHARS));
    let bytes: Vec<char> = html.chars().collect();
    let mut i = 0usize;
    let mut in_tag = false;
    // Suppressed content block, if any: "script" or "style".
    let mut suppress_until: Option<&'static str> = None;

    while i < bytes.len() {
        if out.len() >= MAX_CONTENT_CHARS {
            break;
        }
        let c = bytes[i];

        if let Some(tag) = suppress_until {
            let close = format!("</{tag}");
            if matches_at(&bytes, i, &close) {
                suppress_until = None;
                in_tag = true; // the closing tag itself must still be swallowed.
                i += close.len();
                continue;
            }
            i += 1;
            continue;
        }

        if in_tag {
            if c == '>' {
                in_tag = false;
                out.push(' '); // separate adjacent text nodes that a tag used to join.
            }
            i += 1;
            continue;
        }

        if c == '<' {
            if matches_at_ci(&bytes, i, "<script") {
                suppress_until = Some("script");
                in_tag = true;
                i += 1;
                continue;
            }
            if matches_at_ci(&bytes, i, "<style") {
                suppress_until = Some("style");
                in_tag = true;
                i += 1;
                continue;
            }
            in_tag = true;
            i += 1;
            continue;
        }

        out.push(c);
        i += 1;
    }

    let collapsed = collapse_whitespace(&out);
    if collapsed.chars().count() > MAX_CONTENT_CHARS {
        collapsed.chars().take(MAX_CONTENT_CHARS).collect()
    } else {
        collapsed
    }
}

fn matches_at(chars: &[char], pos: usize, needle: &str) -> bool {
    matches_at_impl(chars, pos, needle, false)
}

fn matches_at_ci(chars: &[char], pos: usize, needle: &str) -> bool {
    matches_at_impl(chars, pos, needle, true)
}

fn matches_at_impl(chars: &[char], pos: usize, needle: &str, ci: bool) -> bool {
    let needle_chars: Vec<char> = needle.chars().collect();
    if pos + needle_chars.len() > chars.len() {
        return false;
    }
    for (offset, nc) in needle_chars.iter().enumerate() {
        let c = chars[pos + offset];
        let eq = if ci {
            c.to_ascii_lowercase() == nc.to_ascii_lowercase()
        } else {
            c == *nc
        };
        if !eq {
            return false;
        }
    }
    true
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_title_reads_first_title_case_insensitively() {
        let html = "<html><HEAD><Title>  Rust Programming Language  </Title></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Rust Programming Language"));
    }

    #[test]
    fn extract_title_returns_none_when_absent() {
        assert_eq!(extract_title("<html><body>no title here</body></html>"), None);
    }

    #[test]
    fn strip_markup_removes_tags_and_collapses_whitespace() {
        let html = "<p>Hello   <b>world</b></p>\n\n<div>again</div>";
        assert_eq!(strip_markup(html), "Hello world again");
    }

    #[test]
    fn strip_markup_suppresses_script_and_style_blocks() {
        let html = "<p>keep</p><script>var x = 1 < 2;</script><style>.a{color:red}</style><p>this</p>";
        assert_eq!(strip_markup(html), "keep this");
    }

    #[test]
    fn strip_markup_truncates_at_cap() {
        let long = "a ".repeat(60_000);
        let html = format!("<p>{long}</p>");
        let stripped = strip_markup(&html);
        assert!(stripped.chars().count() <= MAX_CONTENT_CHARS);
    }
}

//! Link extraction (spec §4.1): finds every `href="…"`/`href='…'`, resolves each
//! against the fetching page's URL (dropping fragments), keeps only `http`/`https`,
//! and caps at 50 links per page.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

const MAX_LINKS_PER_PAGE: usize = 50;

static HREF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)href\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("static regex is valid")
});

/// Extracts absolute `http`/`https` links from `html`, resolved against `base`.
pub fn extract_links(html: &str, base: &Url) -> Vec<String> {
    let mut out = Vec::new();
    for caps in HREF_RE.captures_iter(html) {
        if out.len() >= MAX_LINKS_PER_PAGE {
            break;
        }
        let href = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or("");
        if href.is_empty() {
            continue;
        }
        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }
        resolved.set_fragment(None);
        out.push(resolved.to_string());
    }
    out
}

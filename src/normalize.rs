//! Turn feed-supplied HTML fragments into single-line plain text.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Strip tags, decode entities, collapse whitespace and trim.
///
/// The HTML5 parser recovers from unclosed or stray tags, so malformed input
/// never fails; the worst case is that some markup survives as text.
pub fn clean_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    collapse_whitespace(&text)
}

/// Collapse runs of whitespace to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_html_strips_tags_and_entities() {
        let html = "<p>Sensex&nbsp;gains <b>400</b>   points &amp; Nifty <a href=\"x\">rallies</a></p>";
        assert_eq!(clean_html(html), "Sensex gains 400 points & Nifty rallies");
    }

    #[test]
    fn test_clean_html_tolerates_malformed_markup() {
        let html = "<div><p>Unclosed <i>italic\n\n<span>and stray</div> tail";
        assert_eq!(clean_html(html), "Unclosed italic and stray tail");
    }

    #[test]
    fn test_clean_html_blank_input() {
        assert_eq!(clean_html("   "), "");
        assert_eq!(clean_html("plain text"), "plain text");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("நமஸ்காரம்", 3), "நமஸ");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}

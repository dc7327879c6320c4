//! Full-text extraction from an article page or a full-content feed item.

use crate::normalize::collapse_whitespace;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// Paragraphs shorter than this are bylines, captions or share prompts.
const MIN_PARAGRAPH_CHARS: usize = 40;
/// Below this the page did not yield an article body.
const MIN_BODY_CHARS: usize = 200;
const MAX_BODY_CHARS: usize = 20_000;

const BOILERPLATE: &[&str] = &[
    "also read",
    "subscribe",
    "click here",
    "follow us",
    "all rights reserved",
    "download the app",
    "©",
];

/// Paragraph selectors from most to least specific.
static PARAGRAPHS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "article p",
        "[itemprop=articleBody] p",
        "div[class*=story] p, div[class*=article] p, div[class*=content] p",
        "main p",
        "p",
    ]
    .into_iter()
    .map(|css| Selector::parse(css).expect("paragraph selector"))
    .collect()
});

/// Extract readable body text, paragraphs separated by blank lines.
///
/// Returns `None` when nothing body-like is found.
pub fn extract_body(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for selector in PARAGRAPHS.iter() {
        let paragraphs: Vec<String> = document
            .select(selector)
            .map(|p| collapse_whitespace(&p.text().collect::<String>()))
            .filter(|p| p.chars().count() >= MIN_PARAGRAPH_CHARS && !is_boilerplate(p))
            .collect();

        let mut body = String::new();
        for para in dedup(paragraphs) {
            if body.chars().count() + para.chars().count() > MAX_BODY_CHARS {
                break;
            }
            if !body.is_empty() {
                body.push_str("\n\n");
            }
            body.push_str(&para);
        }
        if body.chars().count() >= MIN_BODY_CHARS {
            return Some(body);
        }
    }
    None
}

fn is_boilerplate(paragraph: &str) -> bool {
    let lower = paragraph.to_lowercase();
    BOILERPLATE.iter().any(|b| lower.contains(b))
}

fn dedup(paragraphs: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    paragraphs
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

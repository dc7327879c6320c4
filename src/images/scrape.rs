//! Image candidates from the feed entry itself and from the article page.
//!
//! Everything here is synchronous parsing; the caller owns the fetch so a
//! parsed `Html` never lives across an await point.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Substrings that mark site chrome rather than story art.
const CHROME_MARKERS: &[&str] = &["google", "logo", "icon", "avatar", "default"];

/// Extra markers for inline `<img>` tags, which include ad slots.
const INLINE_MARKERS: &[&str] = &["/ads/", "adserver", "banner"];

const MIN_INLINE_WIDTH: u32 = 400;
const MIN_INLINE_HEIGHT: u32 = 200;

static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").expect("img selector"));
static ARTICLE_IMG: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article img[src]").expect("article img selector"));
static CONTENT_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("main[class], div[class]").expect("container selector"));
static CONTENT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)content|article|story|post").expect("content class regex"));

/// `(selector, attribute)` pairs for page-level image metadata, in priority order.
static META_IMAGE: Lazy<Vec<(Selector, &'static str)>> = Lazy::new(|| {
    [
        (r#"meta[property="og:image"]"#, "content"),
        (r#"meta[name="twitter:image"]"#, "content"),
        (r#"meta[itemprop="image"]"#, "content"),
        (r#"link[rel="image_src"]"#, "href"),
    ]
    .into_iter()
    .map(|(css, attr)| (Selector::parse(css).expect("meta image selector"), attr))
    .collect()
});

/// Media the feed entry carries on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedMedia<'a> {
    /// `media:content`, `media:thumbnail` and image enclosures, in feed order.
    pub media_urls: &'a [String],
    pub summary_html: Option<&'a str>,
    pub content_html: Option<&'a str>,
}

impl FeedMedia<'_> {
    pub fn is_empty(&self) -> bool {
        self.media_urls.is_empty() && self.summary_html.is_none() && self.content_html.is_none()
    }
}

fn has_marker(url: &str, markers: &[&str]) -> bool {
    let url = url.to_lowercase();
    markers.iter().any(|m| url.contains(m))
}

/// First attached media URL, else the first `<img>` in the summary, else in the content.
pub fn feed_media_image(media: &FeedMedia<'_>) -> Option<String> {
    if let Some(url) = media.media_urls.iter().find(|u| !u.trim().is_empty()) {
        return Some(url.trim().to_string());
    }
    [media.summary_html, media.content_html]
        .into_iter()
        .flatten()
        .find_map(first_img_src)
}

/// `src` of the first `<img>` in an HTML fragment.
pub fn first_img_src(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&IMG)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .find(|src| !src.is_empty())
        .map(str::to_string)
}

/// Best lead image on an article page, resolved against `page_url`.
///
/// Tries Open Graph, Twitter card, schema.org and `image_src` metadata first,
/// then large `<img>` tags inside `<article>`, then the first image of a
/// content-looking container.
pub fn page_image(html: &str, page_url: &str) -> Option<String> {
    let base = Url::parse(page_url).ok()?;
    let document = Html::parse_document(html);

    for (selector, attr) in META_IMAGE.iter() {
        let candidate = document
            .select(selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|src| !src.is_empty());
        if let Some(src) = candidate {
            if !has_marker(src, CHROME_MARKERS) {
                if let Some(url) = absolutize(&base, src) {
                    return Some(url);
                }
            }
        }
    }

    for img in document.select(&ARTICLE_IMG) {
        if !is_large(&img) {
            continue;
        }
        let Some(src) = img.value().attr("src") else {
            continue;
        };
        if has_marker(src, CHROME_MARKERS) || has_marker(src, INLINE_MARKERS) {
            continue;
        }
        if let Some(url) = absolutize(&base, src) {
            return Some(url);
        }
    }

    let container = document.select(&CONTENT_CONTAINER).find(|el| {
        el.value()
            .attr("class")
            .is_some_and(|class| CONTENT_CLASS.is_match(class))
    })?;
    let src = container.select(&IMG).next()?.value().attr("src")?;
    if has_marker(src, CHROME_MARKERS) || has_marker(src, INLINE_MARKERS) {
        return None;
    }
    absolutize(&base, src)
}

fn is_large(img: &ElementRef<'_>) -> bool {
    let dim = |name: &str| -> Option<u32> { img.value().attr(name)?.trim().parse().ok() };
    match (dim("width"), dim("height")) {
        (Some(w), Some(h)) => w > MIN_INLINE_WIDTH && h > MIN_INLINE_HEIGHT,
        _ => false,
    }
}

/// Protocol-relative URLs get `https:`, root-relative ones the page origin.
fn absolutize(base: &Url, src: &str) -> Option<String> {
    let src = src.trim();
    if let Some(rest) = src.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(src.to_string());
    }
    if src.starts_with("data:") {
        return None;
    }
    base.join(src).ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_media_prefers_attachments() {
        let media = vec!["https://cdn.example/lead.jpg".to_string()];
        let hints = FeedMedia {
            media_urls: &media,
            summary_html: Some(r#"<img src="https://cdn.example/inline.jpg">"#),
            content_html: None,
        };
        assert_eq!(
            feed_media_image(&hints).as_deref(),
            Some("https://cdn.example/lead.jpg")
        );
    }

    #[test]
    fn test_feed_media_falls_back_to_summary_then_content() {
        let hints = FeedMedia {
            media_urls: &[],
            summary_html: Some("<p>No picture here</p>"),
            content_html: Some(r#"<div><img src="https://cdn.example/body.jpg"/></div>"#),
        };
        assert_eq!(
            feed_media_image(&hints).as_deref(),
            Some("https://cdn.example/body.jpg")
        );
        assert_eq!(feed_media_image(&FeedMedia::default()), None);
    }

    #[test]
    fn test_page_image_prefers_open_graph() {
        let html = r#"<html><head>
            <meta name="twitter:image" content="https://cdn.example/tw.jpg">
            <meta property="og:image" content="https://cdn.example/og.jpg">
        </head><body></body></html>"#;
        assert_eq!(
            page_image(html, "https://news.example/a/1").as_deref(),
            Some("https://cdn.example/og.jpg")
        );
    }

    #[test]
    fn test_page_image_skips_logo_metadata() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://news.example/static/site-logo.png">
            <meta name="twitter:image" content="https://cdn.example/story.jpg">
        </head></html>"#;
        assert_eq!(
            page_image(html, "https://news.example/a/1").as_deref(),
            Some("https://cdn.example/story.jpg")
        );
    }

    #[test]
    fn test_page_image_large_article_img_resolves_relative() {
        let html = r#"<html><body><article>
            <img src="/img/tiny.jpg" width="50" height="50">
            <img src="/img/ads/slot.jpg" width="800" height="400">
            <img src="/img/lead.jpg" width="800" height="450">
        </article></body></html>"#;
        assert_eq!(
            page_image(html, "https://news.example/india/story-1").as_deref(),
            Some("https://news.example/img/lead.jpg")
        );
    }

    #[test]
    fn test_page_image_content_container_protocol_relative() {
        let html = r#"<html><body>
            <div class="nav"><img src="//cdn.example/nav.png"></div>
            <div class="story-body"><img src="//cdn.example/photo.jpg"></div>
        </body></html>"#;
        assert_eq!(
            page_image(html, "https://news.example/x").as_deref(),
            Some("https://cdn.example/photo.jpg")
        );
    }

    #[test]
    fn test_page_image_nothing_usable() {
        assert_eq!(page_image("<html><body><p>text</p></body></html>", "https://n.example/"), None);
        assert_eq!(page_image("<html></html>", "not a url"), None);
    }
}

//! RSS 2.0 / Atom / RDF parsing into flat [`FeedEntry`] records.
//!
//! `feed-rs` does the format work. This module only picks the fields the
//! pipeline needs: the article link, the media attachments that are images,
//! and the publisher behind an aggregator item.

use crate::error::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use feed_rs::model::{Entry, Link};
use feed_rs::parser;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// Google News names the publisher in a grey `<font>` after the headline link.
static PUBLISHER_FONT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("font[color]").expect("publisher font selector"));

const NON_IMAGE_EXTENSIONS: &[&str] = &[".mp4", ".m3u8", ".mp3", ".m4a", ".webm", ".mov", ".pdf"];

/// One `<item>` or `<entry>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub link: String,
    pub title: String,
    pub summary_html: Option<String>,
    pub content_html: Option<String>,
    /// Publisher behind an aggregator item.
    pub publisher: Option<String>,
    pub author: Option<String>,
    /// Image attachments: media content and enclosures, then thumbnails, then Atom enclosure links.
    pub media_urls: Vec<String>,
    pub published: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<FeedEntry>,
    /// Entries dropped for lacking a link or a title.
    pub skipped: usize,
}

/// Parse a feed document.
///
/// # Errors
///
/// [`Error::Feed`](crate::error::Error::Feed) when the document is not
/// well-formed or not a feed at all.
pub fn parse_feed(xml: &str) -> Result<ParsedFeed> {
    let feed = parser::Builder::new()
        .timestamp_parser(parse_date)
        .build()
        .parse(xml.as_bytes())?;

    let mut parsed = ParsedFeed {
        title: feed.title.map(|t| t.content.trim().to_string()),
        ..ParsedFeed::default()
    };
    for entry in feed.entries {
        match to_entry(entry) {
            Some(entry) => parsed.entries.push(entry),
            None => parsed.skipped += 1,
        }
    }
    Ok(parsed)
}

fn to_entry(entry: Entry) -> Option<FeedEntry> {
    let link = select_link(&entry)?;
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())?;
    let summary_html = entry
        .summary
        .as_ref()
        .map(|s| s.content.trim().to_string())
        .filter(|s| !s.is_empty());
    let publisher = entry
        .source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with("http"))
        .map(str::to_string)
        .or_else(|| summary_html.as_deref().and_then(publisher_from_summary));

    Some(FeedEntry {
        link,
        title,
        content_html: entry
            .content
            .as_ref()
            .and_then(|c| c.body.as_deref())
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string),
        summary_html,
        publisher,
        author: entry
            .authors
            .iter()
            .map(|p| p.name.trim())
            .find(|n| !n.is_empty())
            .map(str::to_string),
        media_urls: image_urls(&entry),
        published: entry.published.or(entry.updated),
    })
}

/// The alternate link, else any link, else a URL-shaped id.
fn select_link(entry: &Entry) -> Option<String> {
    let usable = |l: &&Link| !l.href.trim().is_empty();
    entry
        .links
        .iter()
        .filter(usable)
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| {
            entry
                .links
                .iter()
                .filter(usable)
                .find(|l| l.rel.as_deref() != Some("enclosure"))
        })
        .map(|l| l.href.trim().to_string())
        .or_else(|| entry.id.starts_with("http").then(|| entry.id.trim().to_string()))
}

fn looks_like_image(url: &str, mime: Option<&str>) -> bool {
    match mime {
        Some(m) => m.starts_with("image/"),
        None => {
            let path = url.split(['?', '#']).next().unwrap_or(url).to_lowercase();
            !NON_IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        }
    }
}

fn image_urls(entry: &Entry) -> Vec<String> {
    let contents = entry.media.iter().flat_map(|object| &object.content).filter_map(|c| {
        let url = c.url.as_ref()?.to_string();
        let mime = c.content_type.as_ref().map(|m| m.essence().to_string());
        looks_like_image(&url, mime.as_deref()).then_some(url)
    });
    let thumbnails = entry
        .media
        .iter()
        .flat_map(|object| &object.thumbnails)
        .map(|t| t.image.uri.trim().to_string());
    let enclosures = entry
        .links
        .iter()
        .filter(|l| {
            l.rel.as_deref() == Some("enclosure")
                && l.media_type.as_deref().is_some_and(|t| t.starts_with("image/"))
        })
        .map(|l| l.href.trim().to_string());

    contents
        .chain(thumbnails)
        .chain(enclosures)
        .filter(|u| !u.is_empty())
        .unique()
        .collect()
}

fn publisher_from_summary(html: &str) -> Option<String> {
    let doc = Html::parse_fragment(html);
    doc.select(&PUBLISHER_FONT)
        .last()
        .map(|f| f.text().collect::<String>().trim().to_string())
        .filter(|p| !p.is_empty())
}

/// Parse the date formats seen in the wild: RFC 2822 (with `IST` accepted),
/// RFC 3339 and a bare `YYYY-MM-DD HH:MM:SS` taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Indian publishers often stamp "IST", which RFC 2822 does not know.
    if let Some(stripped) = raw.strip_suffix(" IST") {
        if let Ok(dt) = DateTime::parse_from_rfc2822(&format!("{stripped} +0530")) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

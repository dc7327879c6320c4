//! Image resolution as a short-circuiting chain of stages.
//!
//! Stages run in [`STAGES`] order and the first one to produce a URL wins:
//!
//! 1. [`Stage::EntityMap`]: curated phrase → encyclopedia page lead image
//! 2. [`Stage::EntitySearch`]: proper-noun runs from the title → encyclopedia search
//! 3. [`Stage::FeedMedia`]: media attached to the feed entry or inlined in its HTML
//! 4. [`Stage::PageScrape`]: metadata and large images on the article page
//!
//! Every stage swallows its own failures. When all of them come back empty the
//! caller gets [`placeholder_url`], which depends only on the title.

pub mod cache;
pub mod entities;
pub mod scrape;
pub mod wikipedia;

use crate::http::Fetch;
use scrape::FeedMedia;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, instrument};
use wikipedia::Wikipedia;

const PLACEHOLDER_HOST: &str = "https://picsum.photos/seed/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    EntityMap,
    EntitySearch,
    FeedMedia,
    PageScrape,
}

pub const STAGES: [Stage; 4] = [
    Stage::EntityMap,
    Stage::EntitySearch,
    Stage::FeedMedia,
    Stage::PageScrape,
];

/// What the resolver knows about one article.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRequest<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// Article page to scrape; `None` skips the page stage.
    pub page_url: Option<&'a str>,
    pub media: FeedMedia<'a>,
}

/// Stable synthetic image for a title.
pub fn placeholder_url(title: &str) -> String {
    let digest = Sha256::digest(title.as_bytes());
    let seed: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();
    format!("{PLACEHOLDER_HOST}{seed}/800/450")
}

/// True for a blank URL or one produced by [`placeholder_url`].
pub fn needs_image(url: Option<&str>) -> bool {
    match url.map(str::trim) {
        None | Some("") => true,
        Some(u) => u.contains("picsum.photos"),
    }
}

#[derive(Debug)]
pub struct ImageResolver<F> {
    fetcher: F,
    wikipedia: Wikipedia<F>,
    page_timeout: Duration,
}

impl<F: Fetch + Clone> ImageResolver<F> {
    pub fn new(fetcher: F, wikipedia: Wikipedia<F>, page_timeout: Duration) -> Self {
        Self {
            fetcher,
            wikipedia,
            page_timeout,
        }
    }

    /// First image any stage finds, or `None`.
    #[instrument(level = "debug", skip_all, fields(title = %crate::utils::truncate_for_log(req.title, 60)))]
    pub async fn resolve(&self, req: &ImageRequest<'_>) -> Option<String> {
        for stage in STAGES {
            if let Some(url) = self.run_stage(stage, req).await {
                debug!(?stage, image = %crate::utils::truncate_for_log(&url, 80), "image resolved");
                return Some(url);
            }
        }
        None
    }

    /// [`resolve`](Self::resolve) with the placeholder as the last resort.
    pub async fn resolve_or_placeholder(&self, req: &ImageRequest<'_>) -> String {
        match self.resolve(req).await {
            Some(url) => url,
            None => placeholder_url(req.title),
        }
    }

    async fn run_stage(&self, stage: Stage, req: &ImageRequest<'_>) -> Option<String> {
        match stage {
            Stage::EntityMap => {
                for page in entities::matching_entities(req.title, req.description) {
                    if let Some(url) = self.wikipedia.page_thumbnail(page).await {
                        return Some(url);
                    }
                }
                None
            }
            Stage::EntitySearch => {
                for phrase in entities::extract_proper_nouns(req.title) {
                    if let Some(url) = self.wikipedia.search_thumbnail(&phrase).await {
                        return Some(url);
                    }
                }
                None
            }
            Stage::FeedMedia => scrape::feed_media_image(&req.media),
            Stage::PageScrape => {
                let page_url = req.page_url?;
                match self.fetcher.get(page_url, self.page_timeout).await {
                    Ok(page) => scrape::page_image(&page.body, &page.url),
                    Err(e) => {
                        debug!(url = %page_url, error = %e, "page scrape failed");
                        None
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubFetcher;

    fn resolver(fetcher: StubFetcher) -> ImageResolver<StubFetcher> {
        let wiki = Wikipedia::new(
            fetcher.clone(),
            Duration::from_secs(6),
            Duration::from_secs(8),
            16,
            16,
        );
        ImageResolver::new(fetcher, wiki, Duration::from_secs(10))
    }

    #[test]
    fn test_placeholder_is_stable_and_distinct() {
        let a = placeholder_url("Monsoon session begins");
        assert_eq!(a, placeholder_url("Monsoon session begins"));
        assert_ne!(a, placeholder_url("Monsoon session ends"));
        assert!(a.starts_with("https://picsum.photos/seed/"));
        assert!(a.ends_with("/800/450"));
        assert!(needs_image(Some(&a)));
        assert!(needs_image(None));
        assert!(!needs_image(Some("https://cdn.example/x.jpg")));
    }

    #[tokio::test]
    async fn test_all_stages_failing_gives_same_placeholder_twice() {
        let resolver = resolver(StubFetcher::new());
        let req = ImageRequest {
            title: "Farmers Protest Reaches Day Ten",
            description: "",
            page_url: Some("https://news.example/farmers"),
            media: FeedMedia::default(),
        };
        let first = resolver.resolve_or_placeholder(&req).await;
        let second = resolver.resolve_or_placeholder(&req).await;
        assert_eq!(first, second);
        assert_eq!(first, placeholder_url(req.title));
    }

    #[tokio::test]
    async fn test_entity_stage_wins_over_feed_media() {
        let fetcher = StubFetcher::new().with(
            &wikipedia::summary_url("Nitin_Gadkari"),
            r#"{"thumbnail":{"source":"https://upload.wikimedia.org/wikipedia/commons/thumb/0/0e/Nitin_Gadkari.jpg/300px-Nitin_Gadkari.jpg"}}"#,
        );
        let media = vec!["https://cdn.example/feed.jpg".to_string()];
        let req = ImageRequest {
            title: "Nitin Gadkari opens new expressway",
            description: "",
            page_url: None,
            media: FeedMedia {
                media_urls: &media,
                ..FeedMedia::default()
            },
        };
        assert_eq!(
            resolver(fetcher).resolve(&req).await.as_deref(),
            Some("https://upload.wikimedia.org/wikipedia/commons/thumb/0/0e/Nitin_Gadkari.jpg/600px-Nitin_Gadkari.jpg")
        );
    }

    #[tokio::test]
    async fn test_falls_through_to_page_scrape() {
        let fetcher = StubFetcher::new().with_redirect(
            "https://news.google.com/rss/articles/abc",
            "https://publisher.example/story/1",
            r#"<html><head><meta property="og:image" content="/media/lead.jpg"></head></html>"#,
        );
        let req = ImageRequest {
            title: "quiet day in the markets",
            description: "",
            page_url: Some("https://news.google.com/rss/articles/abc"),
            media: FeedMedia::default(),
        };
        assert_eq!(
            resolver(fetcher).resolve(&req).await.as_deref(),
            Some("https://publisher.example/media/lead.jpg")
        );
    }
}

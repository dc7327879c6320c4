//! Encyclopedia thumbnail lookups: page summary by title, and keyword search.

use super::cache::LookupCache;
use crate::error::Result;
use crate::http::Fetch;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

const SUMMARY_ENDPOINT: &str = "https://en.wikipedia.org/api/rest_v1/page/summary/";
const SEARCH_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// File names of flags, logos and placeholders. Markers must sit between
/// non-letters so "Silicon_Valley.jpg" is not an icon.
static GENERIC_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|[^a-z])(?:flag_of|logo|icon|emblem|coat_of_arms|question_mark|placeholder)(?:[^a-z]|$)",
    )
    .expect("generic image regex")
});

static THUMB_WIDTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+px-").expect("thumb width regex"));

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

#[derive(Debug, Deserialize)]
struct Summary {
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    pages: Vec<SearchPage>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    /// Rank in the search results; the API does not promise array order.
    index: Option<u32>,
    thumbnail: Option<Thumbnail>,
}

/// True for flag/logo/icon style thumbnails that say nothing about a story.
///
/// Only the file name is inspected; every thumbnail lives on the same
/// `upload.wikimedia.org` host.
pub fn is_generic_image(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    GENERIC_IMAGE.is_match(&urlencoding::decode(file).unwrap_or_else(|_| file.into()))
}

pub fn summary_url(page_title: &str) -> String {
    format!("{SUMMARY_ENDPOINT}{}", urlencoding::encode(page_title))
}

pub fn search_url(query: &str) -> String {
    let params = [
        ("action", "query"),
        ("generator", "search"),
        ("gsrsearch", query),
        ("gsrlimit", "5"),
        ("gsrnamespace", "0"),
        ("prop", "pageimages"),
        ("pithumbsize", "600"),
        ("pilimit", "5"),
        ("format", "json"),
        ("formatversion", "2"),
    ];
    match Url::parse_with_params(SEARCH_ENDPOINT, &params) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{SEARCH_ENDPOINT}?gsrsearch={}", urlencoding::encode(query)),
    }
}

/// Cached, failure-tolerant client for the two encyclopedia endpoints.
#[derive(Debug)]
pub struct Wikipedia<F> {
    fetcher: F,
    summary_timeout: Duration,
    search_timeout: Duration,
    summaries: LookupCache,
    searches: LookupCache,
}

impl<F: Fetch> Wikipedia<F> {
    pub fn new(
        fetcher: F,
        summary_timeout: Duration,
        search_timeout: Duration,
        summary_capacity: usize,
        search_capacity: usize,
    ) -> Self {
        Self {
            fetcher,
            summary_timeout,
            search_timeout,
            summaries: LookupCache::new(summary_capacity),
            searches: LookupCache::new(search_capacity),
        }
    }

    /// Lead image of a page, widened to 600px.
    pub async fn page_thumbnail(&self, page_title: &str) -> Option<String> {
        if let Some(cached) = self.summaries.get(page_title) {
            return cached;
        }
        match self.fetch_summary(page_title).await {
            Ok(found) => {
                self.summaries.put(page_title, found.clone());
                found
            }
            Err(e) => {
                debug!(page = %page_title, error = %e, "summary lookup failed");
                None
            }
        }
    }

    /// Thumbnail of the best-ranked search hit that is not a generic image.
    pub async fn search_thumbnail(&self, query: &str) -> Option<String> {
        if let Some(cached) = self.searches.get(query) {
            return cached;
        }
        match self.fetch_search(query).await {
            Ok(found) => {
                self.searches.put(query, found.clone());
                found
            }
            Err(e) => {
                debug!(query = %query, error = %e, "search lookup failed");
                None
            }
        }
    }

    async fn fetch_summary(&self, page_title: &str) -> Result<Option<String>> {
        let resp = self
            .fetcher
            .get(&summary_url(page_title), self.summary_timeout)
            .await?;
        let summary: Summary = serde_json::from_str(&resp.body)?;
        Ok(summary
            .thumbnail
            .map(|t| THUMB_WIDTH.replace(&t.source, "/600px-").into_owned())
            .filter(|src| !src.is_empty() && !is_generic_image(src)))
    }

    async fn fetch_search(&self, query: &str) -> Result<Option<String>> {
        let resp = self
            .fetcher
            .get(&search_url(query), self.search_timeout)
            .await?;
        let parsed: SearchResponse = serde_json::from_str(&resp.body)?;
        let mut pages = parsed.query.map(|q| q.pages).unwrap_or_default();
        pages.sort_by_key(|p| p.index.unwrap_or(u32::MAX));

        let found = pages
            .into_iter()
            .filter_map(|p| p.thumbnail.map(|t| t.source))
            .find(|src| !src.is_empty() && !is_generic_image(src));
        if let Some(src) = &found {
            debug!(query = %query, image = %crate::utils::truncate_for_log(src, 60), "search hit");
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubFetcher;

    fn client(fetcher: StubFetcher) -> Wikipedia<StubFetcher> {
        Wikipedia::new(fetcher, Duration::from_secs(6), Duration::from_secs(8), 8, 8)
    }

    const MODI_THUMB: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/c/c4/Official_Photograph_of_Prime_Minister_Narendra_Modi_Portrait.png/320px-Official_Photograph_of_Prime_Minister_Narendra_Modi_Portrait.png";

    #[test]
    fn test_generic_image_filter() {
        let flag = "https://upload.wikimedia.org/wikipedia/en/thumb/4/41/Flag_of_India.svg/320px-Flag_of_India.svg.png";
        assert!(is_generic_image(flag));
        assert!(is_generic_image(
            "https://upload.wikimedia.org/wikipedia/commons/thumb/1/1e/BJP-Logo.svg/240px-BJP-Logo.svg.png"
        ));
        assert!(is_generic_image(
            "https://upload.wikimedia.org/wikipedia/commons/8/81/Wikimedia-logo.svg"
        ));
        assert!(!is_generic_image(MODI_THUMB));
        assert!(!is_generic_image(
            "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a1/Silicon_Valley_2019.jpg/320px-Silicon_Valley_2019.jpg"
        ));
    }

    #[tokio::test]
    async fn test_real_wikimedia_thumbnail_is_kept() {
        let body = format!(r#"{{"title":"Narendra Modi","thumbnail":{{"source":"{MODI_THUMB}","width":320,"height":400}}}}"#);
        let wiki = client(StubFetcher::new().with(&summary_url("Narendra_Modi"), &body));
        let found = wiki.page_thumbnail("Narendra_Modi").await.unwrap();
        assert!(found.starts_with("https://upload.wikimedia.org/"));
        assert!(found.ends_with("/600px-Official_Photograph_of_Prime_Minister_Narendra_Modi_Portrait.png"));
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = search_url("Tata Punch EV");
        assert!(url.starts_with(SEARCH_ENDPOINT));
        assert!(url.contains("gsrsearch=Tata+Punch+EV"));
        assert!(url.contains("formatversion=2"));
    }

    #[tokio::test]
    async fn test_page_thumbnail_widens_and_caches() {
        let fetcher = StubFetcher::new().with(
            &summary_url("Narendra_Modi"),
            r#"{"title":"Narendra Modi","thumbnail":{"source":"https://upload/thumb/a/ab/Modi.jpg/320px-Modi.jpg","width":320}}"#,
        );
        let wiki = client(fetcher.clone());

        let first = wiki.page_thumbnail("Narendra_Modi").await;
        let second = wiki.page_thumbnail("Narendra_Modi").await;

        assert_eq!(
            first.as_deref(),
            Some("https://upload/thumb/a/ab/Modi.jpg/600px-Modi.jpg")
        );
        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_search_skips_generic_and_respects_rank() {
        let body = r#"{"query":{"pages":[
            {"pageid":3,"title":"C","index":3,"thumbnail":{"source":"https://upload/c.jpg"}},
            {"pageid":1,"title":"A","index":1,"thumbnail":{"source":"https://upload/Flag_of_X.png"}},
            {"pageid":2,"title":"B","index":2,"thumbnail":{"source":"https://upload/b.jpg"}}
        ]}}"#;
        let wiki = client(StubFetcher::new().with(&search_url("Xi Jinping"), body));
        assert_eq!(
            wiki.search_thumbnail("Xi Jinping").await.as_deref(),
            Some("https://upload/b.jpg")
        );
    }

    #[tokio::test]
    async fn test_network_failure_is_none_and_not_cached() {
        let fetcher = StubFetcher::new();
        let wiki = client(fetcher.clone());
        assert_eq!(wiki.page_thumbnail("Nobody").await, None);
        assert_eq!(wiki.page_thumbnail("Nobody").await, None);
        assert_eq!(fetcher.calls(), 2);
    }
}

//! Feed sources and feed parsing.

pub mod catalog;
pub mod rss;

pub use catalog::FeedSource;
pub use rss::{FeedEntry, ParsedFeed};

use crate::error::Result;
use crate::http::Fetch;
use std::time::Duration;
use tracing::{debug, instrument};

/// Download and parse one source.
#[instrument(level = "info", skip_all, fields(source = %source.key))]
pub async fn fetch_feed<F: Fetch>(
    fetcher: &F,
    source: &FeedSource,
    timeout: Duration,
) -> Result<ParsedFeed> {
    let resp = fetcher.get(&source.url, timeout).await?;
    let feed = rss::parse_feed(&resp.body)?;
    debug!(
        entries = feed.entries.len(),
        skipped = feed.skipped,
        "parsed feed"
    );
    Ok(feed)
}

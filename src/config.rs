//! Settings file loading.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration. Example:
//!
//! ```yaml
//! freshness_days: 2
//! poll_interval_secs: 600
//! feeds:
//!   - name: The Hindu National
//!     url: https://www.thehindu.com/news/national/feeder/default.rss
//!     indian: true
//!     default_region: TN
//! ```

use crate::error::Result;
use crate::feeds::{FeedSource, catalog};
use crate::http::Fetch;
use crate::images::wikipedia::Wikipedia;
use crate::ingest::IngestOptions;
use crate::scheduler::ScheduleOptions;
use crate::translate::TranslatorOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub freshness_days: i64,
    pub retention_days: i64,
    pub poll_interval_secs: u64,
    pub run_on_startup: bool,
    pub http_timeout_secs: u64,
    pub image_timeout_secs: u64,
    pub search_timeout_secs: u64,
    pub translate_workers: usize,
    pub chunk_workers: usize,
    pub chunk_max_chars: usize,
    pub description_max_chars: usize,
    pub pending_limit: usize,
    pub prefetch_per_source: usize,
    pub resolve_links: bool,
    pub summary_cache_capacity: usize,
    pub search_cache_capacity: usize,
    pub user_agent: String,
    /// Replaces the built-in catalog when set.
    pub feeds: Option<Vec<FeedSource>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            freshness_days: 3,
            retention_days: 7,
            poll_interval_secs: 300,
            run_on_startup: true,
            http_timeout_secs: 10,
            image_timeout_secs: 6,
            search_timeout_secs: 8,
            translate_workers: 20,
            chunk_workers: 4,
            chunk_max_chars: 1500,
            description_max_chars: 5000,
            pending_limit: 200,
            prefetch_per_source: 3,
            resolve_links: false,
            summary_cache_capacity: 512,
            search_cache_capacity: 1024,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/124.0 Safari/537.36"
                .to_string(),
            feeds: None,
        }
    }
}

impl Settings {
    /// Read settings from `path`, or defaults when no path is given.
    ///
    /// # Errors
    ///
    /// I/O errors reading the file and YAML errors parsing it.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No settings file; using defaults");
            return Ok(Self::default());
        };
        let raw = tokio::fs::read_to_string(path).await?;
        let settings = Self::from_yaml(&raw)?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Configured feeds with keys filled in, or the built-in catalog,
    /// narrowed to `only` when that is non-empty.
    pub fn feeds(&self, only: &[String]) -> Vec<FeedSource> {
        let feeds = match &self.feeds {
            Some(feeds) => feeds.iter().cloned().map(FeedSource::with_derived_key).collect(),
            None => catalog::builtin(),
        };
        feeds.into_iter().filter(|f| f.matches_filter(only)).collect()
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            freshness_days: self.freshness_days,
            feed_timeout: Duration::from_secs(self.http_timeout_secs),
            page_timeout: Duration::from_secs(self.http_timeout_secs),
            resolve_links: self.resolve_links,
            prefetch_per_source: self.prefetch_per_source,
        }
    }

    pub fn translator_options(&self) -> TranslatorOptions {
        TranslatorOptions {
            workers: self.translate_workers,
            chunk_workers: self.chunk_workers,
            chunk_max_chars: self.chunk_max_chars,
            description_max_chars: self.description_max_chars,
        }
    }

    pub fn schedule_options(&self) -> ScheduleOptions {
        ScheduleOptions {
            interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            run_on_startup: self.run_on_startup,
            pending_limit: self.pending_limit,
            retention_days: self.retention_days,
        }
    }

    pub fn wikipedia<F: Fetch>(&self, fetcher: F) -> Wikipedia<F> {
        Wikipedia::new(
            fetcher,
            Duration::from_secs(self.image_timeout_secs),
            Duration::from_secs(self.search_timeout_secs),
            self.summary_cache_capacity,
            self.search_cache_capacity,
        )
    }
}

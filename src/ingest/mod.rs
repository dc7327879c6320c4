//! The ingestion run: every configured feed, one entry at a time.
//!
//! Per entry the pipeline is
//!
//! ```text
//! fetched ─► age check ──(stale)──► dropped
//!               │
//!               ▼
//!          normalized ─► language check ─► [translated] ─► classified ─► image ─► upserted
//! ```
//!
//! Sources run one after another and so do their entries. A source that fails
//! to download or parse is logged and reported as zero; enrichment failures
//! inside an entry degrade that entry. Only storage errors end the run.

pub mod content;

use crate::classify::{classify, detect_region};
use crate::error::Result;
use crate::feeds::{self, FeedEntry, FeedSource};
use crate::http::Fetch;
use crate::images::scrape::FeedMedia;
use crate::images::{ImageRequest, ImageResolver};
use crate::language;
use crate::models::{Article, ArticleDraft, TranslationShadow};
use crate::normalize::clean_html;
use crate::store::{ArticleStore, FetchAttempt};
use crate::translate::{Translate, Translator};
use crate::utils::{host_of, truncate_for_log};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Hosts whose links are redirects rather than publisher pages.
const AGGREGATOR_HOSTS: &[&str] = &["news.google.com"];

/// Newly created article count per source key.
pub type RunReport = BTreeMap<String, usize>;

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    /// Entries published more than this many whole days ago are dropped.
    pub freshness_days: i64,
    pub feed_timeout: Duration,
    /// Timeout for article pages (link resolution and body prefetch).
    pub page_timeout: Duration,
    /// Follow aggregator links to the publisher URL before storing.
    pub resolve_links: bool,
    /// Body prefetches per source per run, for new non-aggregator articles.
    pub prefetch_per_source: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            freshness_days: 3,
            feed_timeout: Duration::from_secs(10),
            page_timeout: Duration::from_secs(10),
            resolve_links: false,
            prefetch_per_source: 3,
        }
    }
}

/// Per-source tallies, logged when the source finishes.
#[derive(Debug, Default)]
struct SourceTally {
    created: usize,
    updated: usize,
    stale: usize,
    skipped: usize,
    prefetched: usize,
}

enum EntryOutcome {
    Stale,
    /// Nothing usable left after normalization.
    Skipped,
    Created(Article),
    Updated,
}

/// Title and description as they will be stored.
struct Headline {
    title: String,
    description: String,
    shadow: Option<TranslationShadow>,
}

/// True if `published` is more than `days` whole days before `now`.
pub fn is_stale(published: DateTime<Utc>, now: DateTime<Utc>, days: i64) -> bool {
    (now - published).num_days() > days
}

/// Drop the `" - Publisher"` suffix aggregators append to headlines.
pub fn strip_publisher_suffix(title: &str, publisher: Option<&str>) -> String {
    let Some(publisher) = publisher.map(str::trim).filter(|p| !p.is_empty()) else {
        return title.to_string();
    };
    title
        .strip_suffix(publisher)
        .and_then(|rest| rest.strip_suffix(" - "))
        .map(str::trim_end)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(title)
        .to_string()
}

fn is_aggregator_url(url: &str) -> bool {
    host_of(url).is_some_and(|host| AGGREGATOR_HOSTS.contains(&host.as_str()))
}

/// Earlier translation of the same headline, if the stored article has one.
fn reuse_translation(existing: &Article, raw_title: &str) -> Option<Headline> {
    if !existing.is_translated || existing.original_title.as_deref() != Some(raw_title) {
        return None;
    }
    Some(Headline {
        title: existing.title.clone(),
        description: existing.description.clone(),
        shadow: Some(TranslationShadow {
            original_title: raw_title.to_string(),
            original_description: existing.original_description.clone().unwrap_or_default(),
            language: existing.original_language.clone().unwrap_or_default(),
        }),
    })
}

/// Runs feeds through the pipeline into an [`ArticleStore`].
pub struct Ingestor<'a, F, T, S> {
    fetcher: &'a F,
    translator: &'a Translator<T>,
    images: &'a ImageResolver<F>,
    store: &'a S,
    options: IngestOptions,
}

impl<'a, F, T, S> Ingestor<'a, F, T, S>
where
    F: Fetch + Clone,
    T: Translate,
    S: ArticleStore,
{
    pub fn new(
        fetcher: &'a F,
        translator: &'a Translator<T>,
        images: &'a ImageResolver<F>,
        store: &'a S,
        options: IngestOptions,
    ) -> Self {
        Self {
            fetcher,
            translator,
            images,
            store,
            options,
        }
    }

    /// Ingest every source in order.
    ///
    /// # Errors
    ///
    /// Only storage failures. Feed, translation and image failures are logged
    /// and absorbed.
    #[instrument(level = "info", skip_all, fields(sources = sources.len()))]
    pub async fn run(&self, sources: &[FeedSource]) -> Result<RunReport> {
        let t0 = Instant::now();
        info!("Starting ingestion run");

        let mut report = RunReport::new();
        for source in sources {
            let created = self.ingest_source(source).await?;
            report.insert(source.key.clone(), created);
        }

        let total: usize = report.values().sum();
        info!(
            total_new = total,
            sources = report.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Ingestion run finished"
        );
        Ok(report)
    }

    #[instrument(level = "info", skip_all, fields(source = %source.key))]
    async fn ingest_source(&self, source: &FeedSource) -> Result<usize> {
        let now = Utc::now();
        let attempt = |succeeded| FetchAttempt {
            key: &source.key,
            name: &source.name,
            url: &source.url,
            continent: source.continent,
            succeeded,
            at: now,
        };

        let feed = match feeds::fetch_feed(self.fetcher, source, self.options.feed_timeout).await {
            Ok(feed) => feed,
            Err(e) => {
                error!(url = %source.url, error = %e, "Feed failed; recording zero new articles");
                self.store.record_fetch(attempt(false)).await?;
                self.store.flush().await?;
                return Ok(0);
            }
        };

        let mut tally = SourceTally::default();
        for entry in &feed.entries {
            match self.ingest_entry(source, entry, now).await? {
                EntryOutcome::Stale => tally.stale += 1,
                EntryOutcome::Skipped => tally.skipped += 1,
                EntryOutcome::Updated => tally.updated += 1,
                EntryOutcome::Created(article) => {
                    tally.created += 1;
                    if !source.aggregator && tally.prefetched < self.options.prefetch_per_source {
                        tally.prefetched += 1;
                        self.prefetch_body(article, entry).await?;
                    }
                }
            }
        }

        self.store.record_fetch(attempt(true)).await?;
        self.store.flush().await?;
        info!(
            new = tally.created,
            updated = tally.updated,
            stale = tally.stale,
            skipped = tally.skipped + feed.skipped,
            prefetched = tally.prefetched,
            "Source done"
        );
        Ok(tally.created)
    }

    async fn ingest_entry(
        &self,
        source: &FeedSource,
        entry: &FeedEntry,
        now: DateTime<Utc>,
    ) -> Result<EntryOutcome> {
        let published = entry.published.unwrap_or(now);
        if is_stale(published, now, self.options.freshness_days) {
            return Ok(EntryOutcome::Stale);
        }

        let publisher = entry.publisher.as_deref();
        let raw_title = strip_publisher_suffix(&clean_html(&entry.title), publisher);
        if raw_title.is_empty() {
            debug!(link = %entry.link, "entry has no text title");
            return Ok(EntryOutcome::Skipped);
        }
        let raw_description = entry
            .summary_html
            .as_deref()
            .map(clean_html)
            .unwrap_or_default();

        let url = self.canonical_url(source, &entry.link).await;
        let existing = self.store.get(&url).await?;

        let headline = match existing
            .as_ref()
            .and_then(|a| reuse_translation(a, &raw_title))
        {
            Some(headline) => headline,
            None => {
                let inline = self
                    .translator
                    .translate_inline(&raw_title, &raw_description)
                    .await;
                Headline {
                    title: inline.title,
                    description: inline.description,
                    shadow: inline.shadow,
                }
            }
        };

        // Classification reads the English text.
        let category = source
            .force_category
            .or_else(|| classify(&headline.title, &headline.description))
            .or(source.default_category);
        let region = detect_region(&format!("{} {}", headline.title, headline.description))
            .or(source.default_region);

        let image_url = match existing.as_ref().and_then(|a| a.image_url.clone()) {
            Some(kept) if !kept.trim().is_empty() => kept,
            _ => {
                let req = ImageRequest {
                    title: &headline.title,
                    description: &headline.description,
                    page_url: Some(url.as_str()),
                    media: FeedMedia {
                        media_urls: &entry.media_urls,
                        summary_html: entry.summary_html.as_deref(),
                        content_html: entry.content_html.as_deref(),
                    },
                };
                self.images.resolve_or_placeholder(&req).await
            }
        };

        let draft = ArticleDraft {
            url,
            title: headline.title,
            description: headline.description,
            author: entry.author.clone(),
            source: publisher
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .unwrap_or(source.name.as_str())
                .to_string(),
            feed: source.key.clone(),
            continent: source.continent,
            published_at: published,
            image_url: Some(image_url),
            category,
            region,
            is_indian_news: source.indian || region.is_some(),
            translation: headline.shadow,
        };

        let upserted = self.store.upsert(draft).await?;
        if upserted.created {
            debug!(
                id = upserted.article.id,
                category = %upserted.article.category,
                title = %truncate_for_log(&upserted.article.title, 60),
                "stored new article"
            );
            Ok(EntryOutcome::Created(upserted.article))
        } else {
            Ok(EntryOutcome::Updated)
        }
    }

    /// The publisher URL behind an aggregator link, when enabled; else `link`.
    async fn canonical_url(&self, source: &FeedSource, link: &str) -> String {
        if !(self.options.resolve_links && source.aggregator) {
            return link.to_string();
        }
        match self.fetcher.get(link, self.options.page_timeout).await {
            Ok(page) if !is_aggregator_url(&page.url) => page.url,
            Ok(_) => link.to_string(),
            Err(e) => {
                debug!(link = %link, error = %e, "link resolution failed");
                link.to_string()
            }
        }
    }

    /// Attach the article body, translating it when it is not English.
    async fn prefetch_body(&self, mut article: Article, entry: &FeedEntry) -> Result<()> {
        let from_feed = entry.content_html.as_deref().and_then(content::extract_body);
        let body = match from_feed {
            Some(body) => Some(body),
            None => match self.fetcher.get(&article.url, self.options.page_timeout).await {
                Ok(page) => content::extract_body(&page.body),
                Err(e) => {
                    warn!(url = %article.url, error = %e, "content extraction failed");
                    None
                }
            },
        };
        let Some(body) = body else {
            return Ok(());
        };

        let lang = language::detect(&body);
        if lang.is_non_english() {
            let translated = self.translator.translate_long(&body, lang).await;
            if translated != body {
                article.original_content = Some(body);
                article.content = Some(translated);
                article
                    .original_language
                    .get_or_insert_with(|| lang.code().to_string());
            } else {
                article.content = Some(body);
            }
        } else {
            article.content = Some(body);
        }
        self.store.save(article).await?;
        Ok(())
    }
}

//! Maintenance jobs over the stored articles.
//!
//! Each reprocessing job picks its candidates with a predicate, re-runs one
//! pipeline stage, saves what changed and reports `updated` vs `unchanged`.

use crate::classify::{classify, detect_region};
use crate::enrich;
use crate::error::{Error, Result};
use crate::http::Fetch;
use crate::images::scrape::FeedMedia;
use crate::images::{ImageRequest, ImageResolver, needs_image};
use crate::models::{Article, Category};
use crate::store::ArticleStore;
use crate::translate::needs_translation;
use chrono::{DateTime, TimeDelta, Utc};
use itertools::Itertools;
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Outcome of a reprocessing job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    pub updated: usize,
    pub unchanged: usize,
    /// Updated articles by the value they were given (category, region, ...).
    pub breakdown: BTreeMap<String, usize>,
}

impl JobReport {
    fn record(&mut self, saved: bool, label: Option<&str>) {
        if !saved {
            self.unchanged += 1;
            return;
        }
        self.updated += 1;
        if let Some(label) = label {
            *self.breakdown.entry(label.to_string()).or_default() += 1;
        }
    }

    /// Log the counts, largest breakdown entries first.
    pub fn log(&self, job: &str) {
        info!(job, updated = self.updated, unchanged = self.unchanged, "Job finished");
        for (label, count) in self.breakdown.iter().sorted_by(|a, b| b.1.cmp(a.1)) {
            info!(job, label = %label, count, "breakdown");
        }
    }
}

/// Translation coverage of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStats {
    pub total: usize,
    pub translated: usize,
    pub pending: usize,
}

/// Delete articles published more than `retention_days` before `now`.
///
/// # Errors
///
/// [`Error::InvalidSetting`] when the window does not fit in a timestamp,
/// and any storage error.
#[instrument(level = "info", skip(store))]
pub async fn cleanup<S: ArticleStore>(
    store: &S,
    retention_days: i64,
    now: DateTime<Utc>,
) -> Result<usize> {
    let cutoff = TimeDelta::try_days(retention_days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| {
            Error::InvalidSetting(format!("retention of {retention_days} days is out of range"))
        })?;
    let deleted = store.delete_older_than(cutoff).await?;
    store.flush().await?;
    info!(deleted, cutoff = %cutoff, "Retention cleanup finished");
    Ok(deleted)
}

/// Re-run image resolution on articles with a blank or placeholder image
/// (every article with `all`), newest first, at most `limit`.
#[instrument(level = "info", skip(store, resolver))]
pub async fn reprocess_images<S, F>(
    store: &S,
    resolver: &ImageResolver<F>,
    all: bool,
    limit: usize,
) -> Result<JobReport>
where
    S: ArticleStore,
    F: Fetch + Clone,
{
    let candidates = store
        .filter(|a| all || needs_image(a.image_url.as_deref()), Some(limit))
        .await?;
    info!(count = candidates.len(), "Reprocessing images");

    let mut report = JobReport::default();
    for mut article in candidates {
        let req = ImageRequest {
            title: &article.title,
            description: &article.description,
            page_url: Some(article.url.as_str()),
            media: FeedMedia::default(),
        };
        let image = resolver.resolve_or_placeholder(&req).await;
        if article.image_url.as_deref() == Some(image.as_str()) {
            report.unchanged += 1;
            continue;
        }
        article.image_url = Some(image);
        report.record(store.save(article).await?, None);
    }
    store.flush().await?;
    Ok(report)
}

/// Re-run the category classifier on WORLD articles (every article with
/// `all`). Articles the classifier has no opinion on are left alone.
#[instrument(level = "info", skip(store))]
pub async fn recategorize<S: ArticleStore>(store: &S, all: bool) -> Result<JobReport> {
    let candidates = store
        .filter(|a| all || a.category == Category::World, None)
        .await?;
    info!(count = candidates.len(), "Classifying articles");

    let mut report = JobReport::default();
    for mut article in candidates {
        match classify(&article.title, &article.description) {
            Some(category) if category != article.category => {
                article.category = category;
                report.record(store.save(article).await?, Some(category.code()));
            }
            _ => report.unchanged += 1,
        }
    }
    store.flush().await?;
    Ok(report)
}

/// Detect regions for articles without one; matches become regional-priority.
#[instrument(level = "info", skip(store))]
pub async fn backfill_regions<S: ArticleStore>(store: &S) -> Result<JobReport> {
    let candidates = store.filter(|a| a.region.is_none(), None).await?;
    info!(count = candidates.len(), "Detecting regions");

    let mut report = JobReport::default();
    for mut article in candidates {
        let Some(region) = detect_region(&article.classification_text()) else {
            report.unchanged += 1;
            continue;
        };
        article.region = Some(region);
        article.is_indian_news = true;
        report.record(store.save(article).await?, Some(region.code()));
    }
    store.flush().await?;
    Ok(report)
}

/// Fill tags, credibility, sentiment and summary for up to `limit` articles
/// that have no summary yet.
#[instrument(level = "info", skip(store))]
pub async fn enrich_articles<S: ArticleStore>(store: &S, limit: usize) -> Result<JobReport> {
    let candidates = store.filter(|a| a.summary.is_none(), Some(limit)).await?;
    info!(count = candidates.len(), "Enriching articles");

    let mut report = JobReport::default();
    for mut article in candidates {
        let enrichment = enrich::enrich(&article);
        let sentiment = format!("{:?}", enrichment.sentiment).to_lowercase();
        enrichment.apply_to(&mut article);
        report.record(store.save(article).await?, Some(sentiment.as_str()));
    }
    store.flush().await?;
    Ok(report)
}

pub async fn translation_stats<S: ArticleStore>(store: &S) -> Result<TranslationStats> {
    let articles: Vec<Article> = store.filter(|_| true, None).await?;
    Ok(TranslationStats {
        total: articles.len(),
        translated: articles.iter().filter(|a| a.is_translated).count(),
        pending: articles.iter().filter(|a| needs_translation(a)).count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::placeholder_url;
    use crate::images::wikipedia::Wikipedia;
    use crate::models::{ArticleDraft, Continent, Region, Sentiment};
    use crate::store::json::JsonStore;
    use crate::store::memory::MemoryStore;
    use crate::testing::StubFetcher;
    use chrono::Duration;
    use std::path::Path;

    fn draft(url: &str, title: &str, age_days: i64) -> ArticleDraft {
        ArticleDraft {
            url: url.to_string(),
            title: title.to_string(),
            description: String::new(),
            author: None,
            source: "The Hindu".to_string(),
            feed: "in:the-hindu".to_string(),
            continent: Continent::Asia,
            published_at: Utc::now() - Duration::days(age_days),
            image_url: None,
            category: None,
            region: None,
            is_indian_news: false,
            translation: None,
        }
    }

    #[tokio::test]
    async fn test_cleanup_deletes_only_old_articles() {
        let store = MemoryStore::new();
        store.upsert(draft("https://old", "Old story", 10)).await.unwrap();
        store.upsert(draft("https://new", "New story", 1)).await.unwrap();

        assert_eq!(cleanup(&store, 7, Utc::now()).await.unwrap(), 1);
        assert!(store.get("https://old").await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_rejects_out_of_range_window() {
        let store = MemoryStore::new();
        store.upsert(draft("https://a", "Story", 1)).await.unwrap();
        let err = cleanup(&store, 999_999_999_999_999, Utc::now()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidSetting(_)));
        assert!(cleanup(&store, i64::MIN, Utc::now()).await.is_err());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    async fn json_store(dir: &Path, drafts: Vec<ArticleDraft>) -> JsonStore {
        let store = JsonStore::open(dir).await.unwrap();
        for d in drafts {
            store.upsert(d).await.unwrap();
        }
        store.flush().await.unwrap();
        store
    }

    async fn reopen(dir: &Path, url: &str) -> Option<Article> {
        JsonStore::open(dir).await.unwrap().get(url).await.unwrap()
    }

    #[tokio::test]
    async fn test_cleanup_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let store = json_store(tmp.path(), vec![draft("https://old", "Old story", 10)]).await;
        cleanup(&store, 7, Utc::now()).await.unwrap();
        assert!(reopen(tmp.path(), "https://old").await.is_none());
    }

    #[tokio::test]
    async fn test_recategorize_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let store = json_store(tmp.path(), vec![draft("https://a", "Virat Kohli scores a century", 0)]).await;
        recategorize(&store, false).await.unwrap();
        let a = reopen(tmp.path(), "https://a").await.unwrap();
        assert_eq!(a.category, Category::Sports);
    }

    #[tokio::test]
    async fn test_backfill_regions_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let store = json_store(tmp.path(), vec![draft("https://a", "Heavy rain lashes Kochi", 0)]).await;
        backfill_regions(&store).await.unwrap();
        let a = reopen(tmp.path(), "https://a").await.unwrap();
        assert_eq!(a.region, Some(Region::Kerala));
        assert!(a.is_indian_news);
    }

    #[tokio::test]
    async fn test_reprocess_images_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let store = json_store(tmp.path(), vec![draft("https://a", "quiet day in the markets", 0)]).await;
        let fetcher = StubFetcher::new();
        let d = std::time::Duration::from_secs(1);
        let resolver = ImageResolver::new(fetcher.clone(), Wikipedia::new(fetcher, d, d, 8, 8), d);
        reprocess_images(&store, &resolver, false, 500).await.unwrap();
        let a = reopen(tmp.path(), "https://a").await.unwrap();
        assert_eq!(a.image_url, Some(placeholder_url("quiet day in the markets")));
    }

    #[tokio::test]
    async fn test_enrich_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let store = json_store(
            tmp.path(),
            vec![draft("https://a", "Sensex surge sets record as profits rise", 0)],
        )
        .await;
        enrich_articles(&store, 100).await.unwrap();
        let a = reopen(tmp.path(), "https://a").await.unwrap();
        assert_eq!(a.sentiment, Some(Sentiment::Positive));
        assert!(a.summary.is_some());
    }

    #[tokio::test]
    async fn test_recategorize_reports_breakdown() {
        let store = MemoryStore::new();
        store.upsert(draft("https://a", "Virat Kohli scores a century", 0)).await.unwrap();
        store.upsert(draft("https://b", "Sensex closes higher", 0)).await.unwrap();
        store.upsert(draft("https://c", "Quiet afternoon downtown", 0)).await.unwrap();

        let report = recategorize(&store, false).await.unwrap();

        assert_eq!(report.updated, 2);
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.breakdown.get("SPORTS"), Some(&1));
        assert_eq!(report.breakdown.get("BUSINESS"), Some(&1));
        // Nothing left to move on a second pass.
        assert_eq!(recategorize(&store, false).await.unwrap().updated, 0);
    }

    #[tokio::test]
    async fn test_backfill_regions_marks_regional_priority() {
        let store = MemoryStore::new();
        store.upsert(draft("https://a", "Heavy rain lashes Kochi", 0)).await.unwrap();
        store.upsert(draft("https://b", "Quiet afternoon downtown", 0)).await.unwrap();

        let report = backfill_regions(&store).await.unwrap();

        assert_eq!((report.updated, report.unchanged), (1, 1));
        let a = store.get("https://a").await.unwrap().unwrap();
        assert_eq!(a.region, Some(Region::Kerala));
        assert!(a.is_indian_news);
    }

    #[tokio::test]
    async fn test_reprocess_images_replaces_blank_with_placeholder_once() {
        let store = MemoryStore::new();
        store.upsert(draft("https://a", "quiet day in the markets", 0)).await.unwrap();
        let fetcher = StubFetcher::new();
        let d = std::time::Duration::from_secs(1);
        let resolver = ImageResolver::new(fetcher.clone(), Wikipedia::new(fetcher, d, d, 8, 8), d);

        let first = reprocess_images(&store, &resolver, false, 500).await.unwrap();
        assert_eq!(first.updated, 1);
        let a = store.get("https://a").await.unwrap().unwrap();
        assert_eq!(a.image_url, Some(placeholder_url("quiet day in the markets")));

        let second = reprocess_images(&store, &resolver, false, 500).await.unwrap();
        assert_eq!((second.updated, second.unchanged), (0, 1));
    }

    #[tokio::test]
    async fn test_enrich_fills_articles_without_summary() {
        let store = MemoryStore::new();
        store
            .upsert(draft("https://a", "Sensex surge sets record as profits rise", 0))
            .await
            .unwrap();

        let report = enrich_articles(&store, 100).await.unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(report.breakdown.get("positive"), Some(&1));

        let a = store.get("https://a").await.unwrap().unwrap();
        assert_eq!(a.sentiment, Some(Sentiment::Positive));
        assert!(a.summary.is_some());
        assert!(a.credibility_score > 50.0);
        assert_eq!(enrich_articles(&store, 100).await.unwrap(), JobReport::default());
    }

    #[tokio::test]
    async fn test_translation_stats() {
        let store = MemoryStore::new();
        store.upsert(draft("https://a", "दिल्ली में भारी बारिश", 0)).await.unwrap();
        store.upsert(draft("https://b", "English headline", 0)).await.unwrap();
        let stats = translation_stats(&store).await.unwrap();
        assert_eq!(
            stats,
            TranslationStats {
                total: 2,
                translated: 0,
                pending: 1
            }
        );
    }
}

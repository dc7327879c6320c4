//! Article storage.
//!
//! The pipeline depends on exactly one storage guarantee: [`ArticleStore::upsert`]
//! is an atomic update-or-insert keyed by URL. Two feeds carrying the same link,
//! or two overlapping runs, converge on one record with last-write-wins fields.
//!
//! # Backends
//!
//! - [`memory::MemoryStore`]: everything behind one async `RwLock`
//! - [`json::JsonStore`]: a `MemoryStore` persisted as an `articles.json` snapshot
//!
//! ```text
//! data_dir/
//! ├── articles.json   # articles + source records
//! └── articles.json.tmp (only while a flush is in progress)
//! ```

pub mod json;
pub mod memory;

use crate::error::Result;
use crate::models::{Article, ArticleDraft, Continent, SourceRecord, Upserted};
use chrono::{DateTime, Utc};

/// One fetch attempt against a configured feed.
#[derive(Debug, Clone, Copy)]
pub struct FetchAttempt<'a> {
    pub key: &'a str,
    pub name: &'a str,
    pub url: &'a str,
    pub continent: Continent,
    pub succeeded: bool,
    pub at: DateTime<Utc>,
}

pub trait ArticleStore {
    async fn get(&self, url: &str) -> Result<Option<Article>>;

    /// Insert a new article for an unseen URL or apply the draft to the existing one.
    async fn upsert(&self, draft: ArticleDraft) -> Result<Upserted>;

    /// Replace the stored article with the same URL.
    ///
    /// Returns `false` (and stores nothing) if the URL is no longer present,
    /// so a job racing retention cleanup cannot resurrect a deleted article.
    async fn save(&self, article: Article) -> Result<bool>;

    /// Articles matching `predicate`, newest `published_at` first.
    async fn filter<P>(&self, predicate: P, limit: Option<usize>) -> Result<Vec<Article>>
    where
        P: Fn(&Article) -> bool;

    /// Delete articles published before `cutoff`; returns how many were removed.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize>;

    async fn record_fetch(&self, attempt: FetchAttempt<'_>) -> Result<()>;

    async fn sources(&self) -> Result<Vec<SourceRecord>>;

    async fn count(&self) -> Result<usize>;

    /// Persist pending changes. A no-op for purely in-memory backends.
    async fn flush(&self) -> Result<()>;
}

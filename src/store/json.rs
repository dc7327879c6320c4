//! JSON snapshot persistence on top of [`MemoryStore`].
//!
//! All reads and writes go to memory; [`ArticleStore::flush`] serializes the
//! whole state to `articles.json`. The snapshot is written to a temporary file
//! first and renamed over the old one, so a crash mid-write leaves the previous
//! snapshot intact.

use super::memory::{MemoryStore, StoreState};
use super::{ArticleStore, FetchAttempt};
use crate::error::Result;
use crate::models::{Article, ArticleDraft, SourceRecord, Upserted};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub const SNAPSHOT_FILE: &str = "articles.json";

#[derive(Debug, Clone)]
pub struct JsonStore {
    inner: MemoryStore,
    path: PathBuf,
}

impl JsonStore {
    /// Open the snapshot in `data_dir`, starting empty if there is none yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or an existing
    /// snapshot cannot be read or parsed.
    #[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display()))]
    pub async fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).await?;
        let path = data_dir.join(SNAPSHOT_FILE);

        let state = if fs::try_exists(&path).await? {
            let raw = fs::read_to_string(&path).await?;
            let state: StoreState = serde_json::from_str(&raw)?;
            info!(
                articles = state.articles.len(),
                sources = state.sources.len(),
                "Loaded snapshot"
            );
            state
        } else {
            info!("No snapshot yet; starting empty");
            StoreState::default()
        };

        Ok(Self {
            inner: MemoryStore::from_state(state),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArticleStore for JsonStore {
    async fn get(&self, url: &str) -> Result<Option<Article>> {
        self.inner.get(url).await
    }

    async fn upsert(&self, draft: ArticleDraft) -> Result<Upserted> {
        self.inner.upsert(draft).await
    }

    async fn save(&self, article: Article) -> Result<bool> {
        self.inner.save(article).await
    }

    async fn filter<P>(&self, predicate: P, limit: Option<usize>) -> Result<Vec<Article>>
    where
        P: Fn(&Article) -> bool,
    {
        self.inner.filter(predicate, limit).await
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        self.inner.delete_older_than(cutoff).await
    }

    async fn record_fetch(&self, attempt: FetchAttempt<'_>) -> Result<()> {
        self.inner.record_fetch(attempt).await
    }

    async fn sources(&self) -> Result<Vec<SourceRecord>> {
        self.inner.sources().await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }

    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    async fn flush(&self) -> Result<()> {
        let state = self.inner.snapshot().await;
        let json = serde_json::to_string(&state)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        tracing::debug!(articles = state.articles.len(), "Wrote snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Continent, Region};

    fn draft(url: &str) -> ArticleDraft {
        ArticleDraft {
            url: url.to_string(),
            title: "Kochi metro extends to airport".to_string(),
            description: "Phase two approved".to_string(),
            author: Some("Staff".to_string()),
            source: "The Hindu".to_string(),
            feed: "state:KL:the-hindu-kerala".to_string(),
            continent: Continent::Asia,
            published_at: Utc::now(),
            image_url: None,
            category: None,
            region: Some(Region::Kerala),
            is_indian_news: true,
            translation: None,
        }
    }

    #[tokio::test]
    async fn test_flush_and_reopen_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStore::open(tmp.path()).await.unwrap();
        store.upsert(draft("https://thehindu.com/kochi")).await.unwrap();
        store.flush().await.unwrap();
        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());

        let reopened = JsonStore::open(tmp.path()).await.unwrap();
        let article = reopened
            .get("https://thehindu.com/kochi")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(article.region, Some(Region::Kerala));
        assert_eq!(reopened.count().await.unwrap(), 1);

        // Ids keep counting from the persisted high-water mark.
        let next = reopened.upsert(draft("https://thehindu.com/other")).await.unwrap();
        assert_eq!(next.article.id, 2);
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(SNAPSHOT_FILE), "{not json").unwrap();
        assert!(JsonStore::open(tmp.path()).await.is_err());
    }
}
